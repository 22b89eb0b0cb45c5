//! Command implementations

pub mod admin;
pub mod contact;
pub mod geocode;
pub mod health;
pub mod history;
pub mod id;
pub mod quote;
pub mod route;
pub mod schedule;
pub mod track;

use crate::app::App;
use anyhow::Result;
use swiftify_geo::Coordinate;
use swiftify_session::AddressRole;

/// Both ends of a delivery as given on the command line
pub struct EndpointRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
}

impl EndpointRequest {
    /// Coordinates for both ends, geocoding whichever were given as addresses
    pub async fn resolve(self, app: &App) -> Result<(Coordinate, Coordinate)> {
        let scheduling = app.ctx.scheduling();
        let origin = match (self.origin, self.from) {
            (Some(coord), _) => coord,
            (None, Some(address)) => scheduling
                .locate(AddressRole::Sender, &address)
                .await
                .map_err(swiftify_core::Error::from)?,
            (None, None) => anyhow::bail!("either --from or --origin is required"),
        };
        let destination = match (self.destination, self.to) {
            (Some(coord), _) => coord,
            (None, Some(address)) => scheduling
                .locate(AddressRole::Receiver, &address)
                .await
                .map_err(swiftify_core::Error::from)?,
            (None, None) => anyhow::bail!("either --to or --destination is required"),
        };
        Ok((origin, destination))
    }
}

/// `lat, lng` with five decimals
pub fn format_coordinate(coord: &Coordinate) -> String {
    format!("{:.5}, {:.5}", coord.latitude, coord.longitude)
}
