use std::path::{Path, PathBuf};

use log::warn;

use crate::{driver::DriverStanding, flags::FlagTable};

pub const DRIVERS_LINK: &str = "/drivers";

/// One breadcrumb, optionally linking to another page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub link: Option<String>,
}

impl Crumb {
    fn new(label: &str, link: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            link: link.map(str::to_string),
        }
    }
}

/// Home / Drivers / <family name>
pub fn breadcrumbs(standing: &DriverStanding) -> Vec<Crumb> {
    vec![
        Crumb::new("Home", None),
        Crumb::new("Drivers", Some(DRIVERS_LINK)),
        Crumb::new(&standing.driver.family_name, None),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Portrait {
    File(PathBuf),
    /// No image for this driver, show the bundled placeholder
    Placeholder,
}

/// Everything shown in the "Driver Details" card.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverCard {
    pub full_name: String,
    pub team: Option<String>,
    pub date_of_birth: String,
    pub nationality: String,
    pub flag_code: Option<String>,
    pub biography_url: String,
    pub championship_position: Option<u32>,
    pub points: f32,
    pub wins: u32,
    pub portrait: Portrait,
}

impl DriverCard {
    pub fn build(standing: &DriverStanding, flags: &FlagTable, asset_dir: Option<&Path>) -> Self {
        let driver = &standing.driver;
        Self {
            full_name: driver.full_name(),
            team: standing.team().map(str::to_string),
            date_of_birth: driver.date_of_birth.clone(),
            nationality: driver.nationality.clone(),
            flag_code: flags.resolve(&driver.nationality).map(str::to_string),
            biography_url: driver.url.clone(),
            championship_position: standing.position,
            points: standing.points,
            wins: standing.wins,
            portrait: portrait(asset_dir, &driver.family_name),
        }
    }
}

/// Portraits live at `<asset_dir>/img/<lower-cased family name>.jpg`.
pub fn portrait_path(asset_dir: &Path, family_name: &str) -> PathBuf {
    asset_dir
        .join("img")
        .join(format!("{}.jpg", family_name.to_lowercase()))
}

fn portrait(asset_dir: Option<&Path>, family_name: &str) -> Portrait {
    let Some(asset_dir) = asset_dir else {
        return Portrait::Placeholder;
    };
    let path = portrait_path(asset_dir, family_name);
    if path.is_file() {
        Portrait::File(path)
    } else {
        warn!("No portrait at {:?}, using placeholder", path);
        Portrait::Placeholder
    }
}
