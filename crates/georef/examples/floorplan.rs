//! Calibrate a floor plan against four surveyed corners and print a JSON
//! report of mapped positions. Control points are hard-coded: collecting them
//! interactively is the host application's job.

use georef::{CalibrationSession, Correspondence, GeoPoint, PixelPoint};
use log::{info, LevelFilter};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MappedPoint {
    x: f64,
    y: f64,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    affine: georef::AffineParams,
    mapped: Vec<MappedPoint>,
    round_trip: MappedPoint,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    georef::core::init_with_level(LevelFilter::Debug)?;

    // Surveyed corners of a 1200x900 px floor plan near Munich.
    let control_points = [
        ((0.0, 0.0), (48.13910, 11.57530)),
        ((1200.0, 0.0), (48.13905, 11.57710)),
        ((0.0, 900.0), (48.13820, 11.57525)),
        ((1200.0, 900.0), (48.13815, 11.57705)),
    ];

    let mut session = CalibrationSession::new();
    for ((x, y), (lat, lon)) in control_points {
        let n = session.add_correspondence(Correspondence::new(
            PixelPoint::new(x, y),
            GeoPoint::new(lat, lon),
        ))?;
        info!("collected control point {n}/4");
    }

    let mapper = session.fit()?;
    info!("calibration fitted");

    let mut mapped = Vec::new();
    for (x, y) in [(600.0, 450.0), (100.0, 100.0), (1150.0, 875.0)] {
        let geo = mapper.to_geo(x, y);
        mapped.push(MappedPoint {
            x,
            y,
            lat: geo.lat,
            lon: geo.lon,
        });
    }

    // And back: recover the plan position of the first mapped point.
    let geo = mapper.to_geo(600.0, 450.0);
    let px = mapper.to_pixel(geo.lat, geo.lon)?;
    info!("round trip for plan center: ({:.3}, {:.3})", px.x, px.y);

    let report = Report {
        affine: *mapper.params(),
        mapped,
        round_trip: MappedPoint {
            x: px.x,
            y: px.y,
            lat: geo.lat,
            lon: geo.lon,
        },
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
