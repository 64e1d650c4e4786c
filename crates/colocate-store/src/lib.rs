//! JSON staging directory that hands data from one pipeline stage to the next.
//!
//! Every file is overwritten on each run and pretty-printed so it can be
//! inspected by hand. Keeping the POI collections on disk is what allows
//! `correlate` to be re-run offline without querying the geocoder again.

pub mod error;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use colocate_core::{CorrelationEntry, Place, PoiCollection, PoiRole};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::StoreError;

pub const PLACE_FILE: &str = "place.json";
pub const CORRELATION_FILE: &str = "correlation.json";

/// A directory holding the staged place, POI collections and correlation.
#[derive(Debug, Clone)]
pub struct StagingDir {
    root: PathBuf,
}

impl StagingDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn place_path(&self) -> PathBuf {
        self.root.join(PLACE_FILE)
    }

    /// `poi_anchor.json`, `poi_secondary.json` or `poi_tertiary.json`.
    #[must_use]
    pub fn poi_path(&self, role: PoiRole) -> PathBuf {
        self.root.join(format!("poi_{}.json", role.as_str()))
    }

    #[must_use]
    pub fn correlation_path(&self) -> PathBuf {
        self.root.join(CORRELATION_FILE)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_place(&self, place: &Place) -> Result<PathBuf, StoreError> {
        self.write_json(self.place_path(), place)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if `place.json` is missing or malformed.
    pub fn read_place(&self) -> Result<Place, StoreError> {
        read_json(&self.place_path())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_pois(
        &self,
        role: PoiRole,
        collection: &PoiCollection,
    ) -> Result<PathBuf, StoreError> {
        self.write_json(self.poi_path(role), collection)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the role's file is missing or malformed.
    pub fn read_pois(&self, role: PoiRole) -> Result<PoiCollection, StoreError> {
        read_json(&self.poi_path(role))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_correlation(&self, entries: &[CorrelationEntry]) -> Result<PathBuf, StoreError> {
        self.write_json(self.correlation_path(), entries)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if `correlation.json` is missing or malformed.
    pub fn read_correlation(&self) -> Result<Vec<CorrelationEntry>, StoreError> {
        read_json(&self.correlation_path())
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        path: PathBuf,
        value: &T,
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        tracing::debug!(path = %path.display(), "wrote staging file");
        Ok(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use colocate_core::{BoundingBox, Coordinate, GeocodedLocation, NearbyPoi, PoiRecord};
    use serde_json::json;

    use super::*;

    fn staging() -> (tempfile::TempDir, StagingDir) {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = StagingDir::new(tmp.path().join("staging"));
        (tmp, dir)
    }

    fn place() -> Place {
        Place::from_geocoded(
            GeocodedLocation {
                address: "Cupertino, Santa Clara County, California, United States".to_owned(),
                coordinate: Coordinate::new(37.322_893_4, -122.032_289_5),
                bbox: Some(BoundingBox::new(37.2536, 37.3417, -122.0972, -121.9950)),
                raw: json!({"place_id": 297_931_187, "osm_type": "relation"}),
            },
            5.0,
        )
    }

    fn record(name: &str) -> PoiRecord {
        PoiRecord {
            name: name.to_owned(),
            address: format!("{name}, Cupertino"),
            coordinate: Coordinate::new(37.32, -122.03),
            category: "park".to_owned(),
            raw: json!({"name": name}),
        }
    }

    #[test]
    fn place_round_trip_preserves_bbox_and_radius_exactly() {
        let (_tmp, dir) = staging();
        let original = place();

        dir.write_place(&original).unwrap();
        let back = dir.read_place().unwrap();

        assert_eq!(back.search_bbox, original.search_bbox);
        assert_eq!(back.radius_miles.to_bits(), original.radius_miles.to_bits());
        assert_eq!(back, original);
    }

    #[test]
    fn place_file_carries_injected_fields() {
        let (_tmp, dir) = staging();
        dir.write_place(&place()).unwrap();

        let text = std::fs::read_to_string(dir.place_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["add_bbox"], false);
        assert!(value["radius_miles"].is_f64());
        assert_eq!(value["search_bbox"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["raw"]["osm_type"], "relation");
    }

    #[test]
    fn poi_collections_are_stored_per_role() {
        let (_tmp, dir) = staging();
        let parks = PoiCollection::new("park", vec![record("Memorial Park")]);
        let bakeries = PoiCollection::new("bakery", vec![record("Sweet Bakery"), record("Crumbs")]);

        dir.write_pois(PoiRole::Anchor, &parks).unwrap();
        dir.write_pois(PoiRole::Tertiary, &bakeries).unwrap();

        assert!(dir.poi_path(PoiRole::Anchor).ends_with("poi_anchor.json"));
        assert_eq!(dir.read_pois(PoiRole::Anchor).unwrap(), parks);
        assert_eq!(dir.read_pois(PoiRole::Tertiary).unwrap().records.len(), 2);
    }

    #[test]
    fn correlation_round_trip() {
        let (_tmp, dir) = staging();
        let entries = vec![CorrelationEntry {
            anchor: record("Memorial Park"),
            secondary: vec![NearbyPoi {
                record: record("Corner Books"),
                distance_miles: 0.065_6,
            }],
            tertiary: vec![],
        }];

        let path = dir.write_correlation(&entries).unwrap();

        assert_eq!(dir.read_correlation().unwrap(), entries);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[0]["secondary"][0]["distance_miles"], 0.065_6);
        assert_eq!(value[0]["secondary"][0]["record"]["name"], "Corner Books");
    }

    #[test]
    fn missing_file_is_io_error_naming_path() {
        let (_tmp, dir) = staging();
        let err = dir.read_pois(PoiRole::Secondary).unwrap_err();
        assert!(matches!(err, StoreError::Io { ref path, .. } if path.ends_with("poi_secondary.json")));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let (_tmp, dir) = staging();
        std::fs::create_dir_all(dir.root()).unwrap();
        std::fs::write(dir.place_path(), "{\"display_name\": 3}").unwrap();

        let err = dir.read_place().unwrap_err();

        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn writes_overwrite_previous_run() {
        let (_tmp, dir) = staging();
        dir.write_pois(PoiRole::Anchor, &PoiCollection::new("park", vec![record("Old")]))
            .unwrap();
        dir.write_pois(PoiRole::Anchor, &PoiCollection::new("park", vec![]))
            .unwrap();

        assert!(dir.read_pois(PoiRole::Anchor).unwrap().records.is_empty());
    }
}
