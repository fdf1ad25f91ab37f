#![doc = "Countrymap public API"]
mod common;

pub mod basemap;
pub mod canvas;
pub mod cli;
pub mod commands;
pub mod error;
pub mod feature;
pub mod filter;
pub mod frame;
pub mod label;
pub mod layers;
pub mod legend;
pub mod proj;
pub mod settings;
pub mod sources;
pub mod theme;

#[doc(inline)]
pub use canvas::Canvas;

#[doc(inline)]
pub use error::PlotError;

#[doc(inline)]
pub use frame::Frame;

#[doc(inline)]
pub use proj::Reprojector;

#[doc(inline)]
pub use settings::Settings;
