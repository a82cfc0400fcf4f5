//!
//! Command-line interface for darkening queries, dose-map inspection
//! and a synthetic-geometry navigation demo.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;

use tknav_calib::{read_dose_map, DarkeningConfig, DarkeningModel};
use tknav_core::{
    BoundPlane, DetUnit, GlobalPoint, GlobalVector, PropagationDirection, RectBounds,
    TrajectoryState, TWO_PI,
};
use tknav_layers::{
    DetRing, DetRod, GeometricSearchLayer, LocalWindowEstimator, StraightLinePropagator,
    TiltedBarrelLayer,
};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("calibration error: {0}")]
    Calib(#[from] tknav_calib::Error),

    #[error("geometry error: {0}")]
    Geometry(#[from] tknav_core::Error),
}

/// Tracker layer navigation and darkening calibration tool.
#[derive(Parser)]
#[command(name = "tknav")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the darkening degradation factor
    Degradation {
        /// Model configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Integrated luminosity (fb^-1)
        #[arg(long)]
        intlumi: f64,

        /// Eta ring
        #[arg(long)]
        ieta: i32,

        /// Longitudinal layer
        #[arg(long)]
        layer: usize,
    },

    /// Show information about a dose-map file
    DosemapInfo {
        /// Dose-map file
        input: PathBuf,
    },

    /// Run a navigation query against a synthetic tilted barrel layer
    Navigate {
        /// Rods per sub-layer
        #[arg(long, default_value = "12")]
        rods: usize,

        /// Inner sub-layer radius (cm)
        #[arg(long, default_value = "23.0")]
        inner_radius: f64,

        /// Outer sub-layer radius (cm)
        #[arg(long, default_value = "25.0")]
        outer_radius: f64,

        /// Trajectory azimuth (rad)
        #[arg(long, default_value = "0.0")]
        phi: f64,

        /// Estimator local-x margin (cm)
        #[arg(long, default_value = "3.0")]
        margin: f64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Degradation {
            config,
            intlumi,
            ieta,
            layer,
        } => {
            let config = DarkeningConfig::from_json_file(config)?;
            let model = DarkeningModel::from_config(&config)?;
            let factor = model.degradation(intlumi, ieta, layer)?;
            println!(
                "degradation at {} fb^-1, ieta {}, layer {}: {:.6}",
                intlumi, ieta, layer, factor
            );
        }

        Commands::DosemapInfo { input } => {
            let map = read_dose_map(&input)?;
            let (min, max, sum) = map.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
            );
            println!("{}", input.display());
            println!("  eta rings: {}", map.nrows());
            println!("  layers:    {}", map.ncols());
            println!("  dose range: {:.4} .. {:.4} Mrad/fb^-1", min, max);
            println!("  mean dose:  {:.4} Mrad/fb^-1", sum / map.len() as f64);
        }

        Commands::Navigate {
            rods,
            inner_radius,
            outer_radius,
            phi,
            margin,
            verbose,
        } => {
            if verbose {
                eprintln!("building synthetic layer: {} rods per sub-layer", rods);
            }
            let layer = demo_layer(rods, inner_radius, outer_radius)?;
            let state = TrajectoryState::new(
                GlobalPoint::new(0.0, 0.0, 0.0),
                GlobalVector::new(phi.cos(), phi.sin(), 0.1),
                0.0,
            );
            let propagator = StraightLinePropagator::new(PropagationDirection::AlongMomentum);
            let estimator = LocalWindowEstimator::new(margin, 2.0);

            let groups = layer.grouped_compatible_dets(&state, &propagator, &estimator);
            println!(
                "{} compatible group(s) for phi = {:.3}",
                groups.len(),
                phi
            );
            for group in &groups {
                println!("group {}/{}:", group.index(), group.index_size());
                for element in group.elements() {
                    let p = element.det().position();
                    let s = element.state().position();
                    println!(
                        "  det r,phi,z: {:.2}, {:.3}, {:.2}  state at r {:.2}",
                        p.perp(),
                        p.phi().radians(),
                        p.z(),
                        s.perp()
                    );
                }
            }
        }
    }

    Ok(())
}

/// A tilted barrel layer with evenly spaced single-module rods and one
/// tilted ring on each side.
fn demo_layer(rods: usize, inner_radius: f64, outer_radius: f64) -> Result<TiltedBarrelLayer> {
    let rod_ring = |radius: f64, phi0: f64| -> Result<Vec<DetRod>> {
        (0..rods)
            .map(|i| {
                let phi = phi0 + i as f64 * TWO_PI / rods as f64;
                let position = GlobalPoint::new(radius * phi.cos(), radius * phi.sin(), 0.0);
                let unit = Arc::new(DetUnit::new(BoundPlane::barrel(
                    position,
                    RectBounds::new(2.0, 10.0),
                )));
                Ok(DetRod::new(vec![unit])?)
            })
            .collect()
    };
    let tilted_ring = |z: f64| -> Result<DetRing> {
        let units = (0..rods)
            .map(|i| {
                let phi = i as f64 * TWO_PI / rods as f64;
                let radius = 0.5 * (inner_radius + outer_radius);
                let position = GlobalPoint::new(radius * phi.cos(), radius * phi.sin(), z);
                Arc::new(DetUnit::new(BoundPlane::tilted(
                    position,
                    0.8_f64.copysign(z),
                    RectBounds::new(2.0, 5.0),
                )))
            })
            .collect();
        Ok(DetRing::new(units)?)
    };

    let half_step = TWO_PI / (2.0 * rods as f64);
    Ok(TiltedBarrelLayer::new(
        rod_ring(inner_radius, 0.0)?,
        rod_ring(outer_radius, half_step)?,
        vec![tilted_ring(-110.0)?],
        vec![tilted_ring(110.0)?],
    )?)
}
