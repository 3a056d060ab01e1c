#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry inspector for the waypoint map core.
//!
//! ```text
//! waypoint destination --lng -0.1276 --lat 51.5074 --distance-km 20 --bearing 74
//! waypoint arc --lng 0 --lat 0 --radius-km 20 --direction East
//! waypoint circle --lng 0 --lat 0 --radius-km 20
//! waypoint curve --from-lng 0 --from-lat 0 --to-lng 2 --to-lat 1
//! ```
//!
//! Each command prints a `GeoJSON` geometry to stdout, ready to paste
//! into geojson.io when debugging wedge shapes or connector curves.

use std::str::FromStr as _;

use clap::{Parser, Subcommand};
use waypoint_geo::arc::{DEFAULT_ARC_SEGMENTS, DEFAULT_CIRCLE_SEGMENTS, DEFAULT_SWEEP_DEG, arc_ring, circle_ring};
use waypoint_geo::curve::{DEFAULT_BEND, DEFAULT_CURVE_SAMPLES, curved_line};
use waypoint_geo::sphere::destination_point;
use waypoint_geo_models::{Coordinate, Direction};

#[derive(Parser)]
#[command(name = "waypoint", about = "Inspect waypoint geometry primitives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the direct geodesic problem from an origin point
    Destination {
        /// Origin longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Origin latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Distance to travel, in kilometres
        #[arg(long)]
        distance_km: f64,
        /// Initial bearing in degrees, clockwise from true north
        #[arg(long, allow_hyphen_values = true)]
        bearing: f64,
    },
    /// Build a directional search-wedge polygon
    Arc {
        /// Centre longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Centre latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Wedge radius in kilometres
        #[arg(long)]
        radius_km: f64,
        /// Direction: North, South, East, or West (or N/S/E/W)
        #[arg(long)]
        direction: String,
        /// Total wedge sweep in degrees
        #[arg(long, default_value_t = DEFAULT_SWEEP_DEG)]
        sweep: f64,
        /// Number of rim segments
        #[arg(long, default_value_t = DEFAULT_ARC_SEGMENTS)]
        segments: usize,
    },
    /// Build a full-circle ring (Overview radius display)
    Circle {
        /// Centre longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Centre latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Circle radius in kilometres
        #[arg(long)]
        radius_km: f64,
        /// Number of rim segments
        #[arg(long, default_value_t = DEFAULT_CIRCLE_SEGMENTS)]
        segments: usize,
    },
    /// Build the bowed connector curve between two points
    Curve {
        /// Start longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        from_lng: f64,
        /// Start latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        /// End longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        to_lng: f64,
        /// End latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        /// Number of interpolation steps
        #[arg(long, default_value_t = DEFAULT_CURVE_SAMPLES)]
        samples: usize,
        /// Bend factor (higher = more bow)
        #[arg(long, default_value_t = DEFAULT_BEND)]
        bend: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Destination {
            lng,
            lat,
            distance_km,
            bearing,
        } => {
            let dest = destination_point(Coordinate::new(lng, lat), distance_km, bearing);
            println!("{}", point_geojson(dest));
        }
        Commands::Arc {
            lng,
            lat,
            radius_km,
            direction,
            sweep,
            segments,
        } => {
            let direction = Direction::from_str(&direction)
                .map_err(|_| format!("unknown direction: {direction}"))?;
            let ring = arc_ring(Coordinate::new(lng, lat), radius_km, direction, sweep, segments);
            if ring.is_empty() {
                log::warn!("{direction} has no wedge; nothing to print");
                return Ok(());
            }
            println!("{}", polygon_geojson(&ring));
        }
        Commands::Circle {
            lng,
            lat,
            radius_km,
            segments,
        } => {
            let ring = circle_ring(Coordinate::new(lng, lat), radius_km, segments);
            println!("{}", polygon_geojson(&ring));
        }
        Commands::Curve {
            from_lng,
            from_lat,
            to_lng,
            to_lat,
            samples,
            bend,
        } => {
            let line = curved_line(
                Coordinate::new(from_lng, from_lat),
                Coordinate::new(to_lng, to_lat),
                samples,
                bend,
            );
            println!("{}", linestring_geojson(&line));
        }
    }

    Ok(())
}

fn positions(coords: &[Coordinate]) -> Vec<serde_json::Value> {
    coords
        .iter()
        .map(|c| serde_json::json!([c.lng, c.lat]))
        .collect()
}

fn point_geojson(coordinate: Coordinate) -> String {
    serde_json::json!({
        "type": "Point",
        "coordinates": [coordinate.lng, coordinate.lat],
    })
    .to_string()
}

fn polygon_geojson(ring: &[Coordinate]) -> String {
    serde_json::json!({
        "type": "Polygon",
        "coordinates": [positions(ring)],
    })
    .to_string()
}

fn linestring_geojson(line: &[Coordinate]) -> String {
    serde_json::json!({
        "type": "LineString",
        "coordinates": positions(line),
    })
    .to_string()
}
