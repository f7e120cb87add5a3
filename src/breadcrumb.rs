use serde::Serialize;

pub const HOME_LABEL: &str = "Главная";
pub const HOME_URL: &str = "/settlements/";

/// The page currently being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Overview,
    Region(String),
    Municipality { region: String, municipality: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub url: String,
}

impl Crumb {
    fn new(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            url,
        }
    }
}

/// Navigation trail from the overview down to `location`.
pub fn build_breadcrumb(location: &Location) -> Vec<Crumb> {
    let mut trail = vec![Crumb::new(HOME_LABEL, HOME_URL.to_string())];
    match location {
        Location::Overview => {}
        Location::Region(region) => trail.push(region_crumb(region)),
        Location::Municipality {
            region,
            municipality,
        } => {
            trail.push(region_crumb(region));
            trail.push(Crumb::new(
                municipality,
                format!("{}regions/{}/{}/", HOME_URL, region, municipality),
            ));
        }
    }
    trail
}

fn region_crumb(region: &str) -> Crumb {
    Crumb::new(region, format!("{}regions/{}/", HOME_URL, region))
}
