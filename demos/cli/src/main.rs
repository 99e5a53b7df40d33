use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use nalgebra::{Point2, Vector2};

use relief::{Grid, Scene};

/// Fixed-step descent on a numeric gradient of the demo function
fn descent(demo: Demo, start: Point2<f64>, steps: usize) -> Vec<Point2<f64>> {
    const EPS: f64 = 1e-6;
    const RATE: f64 = 0.05;

    let mut p = start;
    let mut path = vec![p];
    for _ in 0..steps {
        let f0 = demo.eval(p.x, p.y);
        let dx = (demo.eval(p.x + EPS, p.y) - f0) / EPS;
        let dy = (demo.eval(p.x, p.y + EPS) - f0) / EPS;
        p -= Vector2::new(dx, dy) * RATE;
        path.push(p);
    }
    path
}

/// Demo driver for the relief sampling core
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a top-down PNG of the shaded surface colors
    Surface {
        #[clap(flatten)]
        settings: SceneSettings,

        /// Name of a `.png` file to write
        #[clap(short, long)]
        out: PathBuf,
    },

    /// Trace constraint boundaries and report statistics
    Boundary {
        #[clap(flatten)]
        settings: SceneSettings,
    },

    /// Run a toy gradient descent and lift its path onto the surface
    Descent {
        #[clap(flatten)]
        settings: SceneSettings,

        /// Starting X position
        #[clap(short, long, default_value_t = 4.0)]
        x: f64,

        /// Starting Y position
        #[clap(short, long, default_value_t = 4.0)]
        y: f64,

        /// Number of descent steps
        #[clap(short = 'N', long, default_value_t = 25)]
        steps: usize,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum Demo {
    Paraboloid,
    Saddle,
    Rosenbrock,
}

impl Demo {
    fn eval(self, x: f64, y: f64) -> f64 {
        match self {
            Demo::Paraboloid => x * x + y * y,
            Demo::Saddle => x * x - y * y,
            Demo::Rosenbrock => {
                (1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2)
            }
        }
    }
}

#[derive(Parser)]
struct SceneSettings {
    /// Demo objective function
    #[clap(short, long, value_enum, default_value_t = Demo::Paraboloid)]
    function: Demo,

    /// Keep only points inside a disc of this radius
    #[clap(short, long)]
    radius: Option<f64>,

    /// Samples per axis
    #[clap(short = 'n', long, default_value_t = 200)]
    resolution: usize,

    /// Domain half-extent
    #[clap(short = 's', long, default_value_t = 5.0)]
    extent: f64,
}

impl SceneSettings {
    fn build(&self) -> Result<Scene> {
        let grid = Grid::isotropic(self.extent, self.resolution)?;
        let mut scene = Scene::new(grid);
        let f = self.function;
        scene.set_objective(move |x: f64, y: f64| f.eval(x, y));
        if let Some(radius) = self.radius {
            let r2 = radius * radius;
            scene.add_constraint(Arc::new(move |x: f64, y: f64| {
                x * x + y * y - r2
            }));
        }
        Ok(scene)
    }
}

/// Flattens the band colors into a top-down RGB image, one pixel per sample
///
/// Excluded samples render as white.
fn rasterize(scene: &Scene) -> Vec<u8> {
    let n = scene.grid().resolution();
    let bands = &scene.surface().bands;
    let mut buffer = vec![255u8; n * n * 3];
    for i in 0..n {
        for j in 0..n {
            // Sample (i, j) leads band i; the last row trails band n - 2
            let v = if i + 1 < n {
                &bands[i].vertices[2 * j]
            } else {
                &bands[n - 2].vertices[2 * j + 1]
            };
            if !v.is_valid() {
                continue;
            }
            let px = (n - 1 - j) * n + i;
            for (c, out) in
                v.color.iter().zip(&mut buffer[px * 3..px * 3 + 3])
            {
                *out = (c * 255.0) as u8;
            }
        }
    }
    buffer
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    match Args::parse().cmd {
        Command::Surface { settings, out } => {
            let start = Instant::now();
            let scene = settings.build()?;
            let range = scene.height_range();
            info!(
                "Sampled {} bands (z in [{}, {}]) in {:?}",
                scene.surface().bands.len(),
                range.min,
                range.max,
                start.elapsed(),
            );

            info!("Writing image to {out:?}");
            let n = scene.grid().resolution() as u32;
            image::save_buffer(
                out,
                &rasterize(&scene),
                n,
                n,
                image::ColorType::Rgb8,
            )?;
        }
        Command::Boundary { settings } => {
            let start = Instant::now();
            let scene = settings.build()?;
            info!(
                "Traced {} boundary segments in {:?}",
                scene.boundaries().len(),
                start.elapsed(),
            );
            for seg in scene.boundaries().iter().take(10) {
                info!("  {:?} -> {:?}", seg.start, seg.end);
            }
        }
        Command::Descent {
            settings,
            x,
            y,
            steps,
        } => {
            let mut scene = settings.build()?;
            scene.set_path(descent(
                settings.function,
                Point2::new(x, y),
                steps,
            ));
            info!(
                "Lifted {} of {} path points onto the surface",
                scene.path_vertices().len(),
                steps + 1,
            );
            if let Some(last) = scene.path_vertices().last() {
                info!("  final iterate: {last:?}");
            }
        }
    }

    Ok(())
}
