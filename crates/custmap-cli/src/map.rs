//! Text rendering of the picker map

use custmap_core::models::{GeoCoordinate, MapRegion};
use custmap_core::ports::MapSurface;
use serde::Serialize;
use std::time::Duration;

/// One thing the map surface was asked to show
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapFrame {
    Render { region: MapRegion, marker: GeoCoordinate },
    Animate { region: MapRegion, duration_ms: u64 },
}

impl MapFrame {
    pub fn describe(&self) -> String {
        match self {
            MapFrame::Render { region, marker } => format!(
                "view {} (±{:.4}°, ±{:.4}°), marker at {}",
                region.center, region.latitude_delta, region.longitude_delta, marker
            ),
            MapFrame::Animate { region, duration_ms } => {
                format!("recenter to {} over {} ms", region.center, duration_ms)
            }
        }
    }
}

/// Map surface that records frames for later printing
#[derive(Debug, Default)]
pub struct TerminalMap {
    frames: Vec<MapFrame>,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[MapFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<MapFrame> {
        self.frames
    }
}

impl MapSurface for TerminalMap {
    fn render(&mut self, region: &MapRegion, marker: &GeoCoordinate) {
        self.frames.push(MapFrame::Render { region: *region, marker: *marker });
    }

    fn animate_to_region(&mut self, region: &MapRegion, duration: Duration) {
        self.frames.push(MapFrame::Animate {
            region: *region,
            duration_ms: duration.as_millis() as u64,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_recorded_in_order() {
        let mut map = TerminalMap::new();
        let region = MapRegion::default();

        map.animate_to_region(&region, Duration::from_millis(1000));
        map.render(&region, &region.center);

        assert_eq!(map.frames().len(), 2);
        assert_eq!(map.frames()[0].describe(), "recenter to 37.788250, -122.432400 over 1000 ms");
        assert!(map.frames()[1].describe().starts_with("view 37.788250, -122.432400"));
    }
}
