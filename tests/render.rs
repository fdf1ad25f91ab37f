// End-to-end composition: settings lookup -> thresholds -> reprojection ->
// framing -> layered drawing -> PNG output.

use std::collections::HashMap;
use std::fs;

use geo::{MultiPolygon, Point, polygon};

use countrymap::canvas::Canvas;
use countrymap::feature::{
    Country, CountryLayer, Place, PlaceLayer, WaterBody, WaterLayer, shape_extent,
};
use countrymap::filter::{PlaceFilter, water_labels};
use countrymap::frame::Frame;
use countrymap::legend::{Classification, Legend};
use countrymap::proj::Reprojector;
use countrymap::settings::Settings;
use countrymap::theme::{FONT_NAME, Plane};
use countrymap::{label, layers};

fn country(iso: &str, minx: f64, miny: f64, maxx: f64, maxy: f64) -> Country {
    Country {
        iso: iso.to_string(),
        shape: MultiPolygon(vec![polygon![
            (x: minx, y: miny),
            (x: maxx, y: miny),
            (x: maxx, y: maxy),
            (x: minx, y: maxy),
        ]]),
        anchor: None,
    }
}

fn place(name: &str, iso: &str, lon: f64, lat: f64, population: f64, capital: bool) -> Place {
    Place {
        name: name.to_string(),
        local_name: None,
        font: None,
        population,
        capital,
        iso: iso.to_string(),
        location: Point::new(lon, lat),
    }
}

#[test]
fn settings_thresholds_drive_place_selection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("country_settings.csv");
    fs::write(
        &path,
        "iso_name,crs,popthresh_iso,popthresh_ngb,scalerank\n\
         USA,EPSG:3857,500000,1000000,4\n",
    )
    .unwrap();

    let settings = Settings::load(&path, "USA").unwrap();
    let filter = PlaceFilter {
        target_iso: settings.iso.clone(),
        own_threshold: settings.own_threshold,
        neighbor_threshold: settings.neighbor_threshold,
    };

    let places = PlaceLayer::new(vec![
        place("Denver", "USA", -104.99, 39.74, 600_000.0, false),
        place("Winnipeg", "CAN", -97.14, 49.90, 800_000.0, false),
    ]);
    let (capitals, towns) = filter.split(&places);

    // The domestic city clears the lower own-country floor; the foreign city
    // stays below the neighbor floor and disappears.
    assert!(capitals.records.is_empty());
    assert_eq!(towns.records.len(), 1);
    assert_eq!(towns.records[0].name, "Denver");
}

#[test]
fn full_render_writes_a_png_and_restores_the_font() {
    let proj = Reprojector::to_working("EPSG:3857").unwrap();

    let world = CountryLayer::new(vec![
        country("AAA", 5.0, 45.0, 11.0, 48.0),
        country("BBB", 11.0, 44.0, 16.0, 49.0),
        country("BAD", -10.0, -10.0, -5.0, -5.0),
    ])
    .admit(&["BAD".to_string()])
    .with_anchors()
    .reproject(&proj)
    .unwrap();

    let target = world.find("AAA").unwrap();
    let frame = Frame::buffered(shape_extent(&target.shape).unwrap(), 0.1).unwrap();
    let mut canvas = Canvas::new(frame, 600);

    layers::draw_admin_boundaries(&mut canvas, &world.clip_to(&frame));
    label::label_countries(&mut canvas, &world.clip_anchors_to(&frame), "AAA");

    let lakes = WaterLayer::new(vec![WaterBody {
        name: Some("Lake Middle".to_string()),
        scale_rank: 1,
        shape: MultiPolygon(vec![polygon![
            (x: 7.0, y: 46.0),
            (x: 8.0, y: 46.0),
            (x: 8.0, y: 46.5),
            (x: 7.0, y: 46.5),
        ]]),
        anchor: None,
    }])
    .with_anchors()
    .reproject(&proj)
    .unwrap();
    layers::draw_water(&mut canvas, &lakes.clip_to(&frame), Plane::Lake);
    label::label_waters(&mut canvas, &water_labels(&lakes, 4).clip_anchors_to(&frame));

    let values = HashMap::from([("AAA".to_string(), 120.0), ("BBB".to_string(), 40.0)]);
    let classification = Classification::from_breaks(vec![50.0, 100.0], &[120.0, 40.0]).unwrap();
    layers::draw_data(&mut canvas, &world.clip_to(&frame), &values, &classification);
    Legend::from_classification(&classification, "Contributions", "").unwrap().draw(&mut canvas);

    let places = PlaceLayer::new(vec![
        {
            let mut capital = place("Hauptstadt", "AAA", 7.5, 46.9, 140_000.0, true);
            capital.local_name = Some("Hauptstadt".to_string());
            capital.font = Some("Noto Sans JP".to_string());
            capital
        },
        place("Kleinstadt", "AAA", 9.5, 47.0, 60_000.0, false),
    ])
    .reproject(&proj)
    .unwrap()
    .clip_to(&frame);
    let filter = PlaceFilter {
        target_iso: "AAA".to_string(),
        own_threshold: 50_000.0,
        neighbor_threshold: 250_000.0,
    };
    let (capitals, towns) = filter.split(&places);

    layers::draw_places(&mut canvas, &towns);
    label::label_places(&mut canvas, &towns, false);
    layers::draw_capitals(&mut canvas, &capitals);
    label::label_places(&mut canvas, &capitals, true);

    // Scoped per-record overrides never leak past the label pass.
    assert_eq!(canvas.active_font(), FONT_NAME);

    let svg = canvas.finish();
    // The denylisted outline never made it into the figure.
    assert!(!svg.contains(">BAD<"));
    // Capital star, legend box, and wrapped water label are all present.
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("Contributions"));
    assert!(svg.contains("<tspan"));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("AAA.png");
    canvas.write_png(&out).unwrap();

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], &b"\x89PNG\r\n\x1a\n"[..]);
}
