//! Command implementations behind the CLI.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::basemap::Basemap;
use crate::canvas::Canvas;
use crate::cli::PlotArgs;
use crate::common::ensure_dir_exists;
use crate::feature::{CountryLayer, shape_extent};
use crate::filter::{PlaceFilter, water_labels};
use crate::frame::Frame;
use crate::legend::{Classification, Legend};
use crate::proj::{Reprojector, WGS84};
use crate::settings::Settings;
use crate::theme::Plane;
use crate::{label, layers, sources};

// Dataset locations inside the data directory.
const SETTINGS_PATH: &str = "country_settings.csv";
const WORLD_PATH: &str = "admin/geoBoundariesCGAZ_ADM0.shp";
const PLACE_PATH: &str = "places/worldcities.csv";
const LAKE_PATH: &str = "marine/ne_10m_lakes.shp";
const MARINE_PATH: &str = "marine/ne_10m_geography_marine_polys.shp";
const BASEMAP_PATH: &str = "basemap/eo_base_2020_clean_geo.tif";

/// Render one country's reference map and write `<out>/<ISO>.png`.
pub fn plot(args: &PlotArgs) -> Result<()> {
    let settings = Settings::load(&args.data_dir.join(SETTINGS_PATH), &args.iso)?;
    log::info!("rendering {} in {}", settings.iso, settings.crs);

    let proj = Reprojector::to_working(&settings.crs)?;
    let inverse = Reprojector::new(&settings.crs, WGS84)?;

    // Admin boundaries anchor the frame, so they come first.
    let world = sources::read_world_admin(&args.data_dir.join(WORLD_PATH))?
        .admit(&args.exclude_iso)
        .with_anchors()
        .reproject(&proj)?;

    let target = world.find(&settings.iso).with_context(|| {
        format!("target country {} not present in the admin dataset", settings.iso)
    })?;
    let extent = shape_extent(&target.shape).context("target country has no extent")?;
    let frame = Frame::buffered(extent, args.buffer)?;

    let mut canvas = Canvas::new(frame, args.width);

    // Basemap, when the raster is present.
    let basemap_path = args.data_dir.join(BASEMAP_PATH);
    if basemap_path.is_file() {
        let basemap = Basemap::load(&basemap_path)?;
        layers::draw_basemap(&mut canvas, &basemap, &proj, &inverse)?;
    } else {
        log::warn!("no basemap at {}, rendering without", basemap_path.display());
    }

    // Admin boundaries and country code labels.
    layers::draw_admin_boundaries(&mut canvas, &world.clip_to(&frame));
    label::label_countries(&mut canvas, &world.clip_anchors_to(&frame), &settings.iso);

    // Water polygons: marine below the data layer, lakes above it.
    for (rel, plane) in [(MARINE_PATH, Plane::Marine), (LAKE_PATH, Plane::Lake)] {
        let path = args.data_dir.join(rel);
        if !path.is_file() {
            log::warn!("no water dataset at {}, skipped", path.display());
            continue;
        }
        let water = sources::read_water(&path)?.with_anchors().reproject(&proj)?;
        layers::draw_water(&mut canvas, &water.clip_to(&frame), plane);

        let labeled = water_labels(&water, settings.scale_rank_cutoff).clip_anchors_to(&frame);
        label::label_waters(&mut canvas, &labeled);
    }

    // Thematic data layer, keeping its legend.
    if let Some(data_path) = &args.data {
        draw_data_layer(&mut canvas, &world.clip_to(&frame), args, data_path)?;
    }

    // Places: markers and labels, capitals after towns.
    let places = sources::read_places(&args.data_dir.join(PLACE_PATH))?
        .reproject(&proj)?
        .clip_to(&frame);
    let filter = PlaceFilter {
        target_iso: settings.iso.clone(),
        own_threshold: settings.own_threshold,
        neighbor_threshold: settings.neighbor_threshold,
    };
    let (capitals, towns) = filter.split(&places);
    log::info!("places kept: {} capitals, {} towns", capitals.records.len(), towns.records.len());

    layers::draw_places(&mut canvas, &towns);
    label::label_places(&mut canvas, &towns, false);
    layers::draw_capitals(&mut canvas, &capitals);
    label::label_places(&mut canvas, &capitals, true);

    ensure_dir_exists(&args.out)?;
    let out_path = args.out.join(format!("{}.png", settings.iso));
    canvas.write_png(&out_path)?;
    log::info!("wrote {}", out_path.display());
    Ok(())
}

/// Join the values table onto the admin polygons and draw the choropleth
/// fill plus its legend.
fn draw_data_layer(
    canvas: &mut Canvas,
    world: &CountryLayer,
    args: &PlotArgs,
    data_path: &Path,
) -> Result<()> {
    if args.breaks.is_empty() {
        bail!("--breaks is required when --data is given");
    }

    let values = sources::read_values(data_path)?;
    let observed: Vec<f64> = values.values().copied().collect();
    let Some(classification) = Classification::from_breaks(args.breaks.clone(), &observed) else {
        log::warn!("data table {} is empty, data layer skipped", data_path.display());
        return Ok(());
    };

    layers::draw_data(canvas, world, &values, &classification);
    Legend::from_classification(&classification, &args.legend_title, &args.units)?.draw(canvas);
    Ok(())
}
