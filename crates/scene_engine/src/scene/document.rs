//! Scene document persistence
//!
//! A document is an ordered list of cube positions. On disk it is XML:
//!
//! ```xml
//! <cena>
//!   <cubo x="1" y="0" z="1"/>
//!   <cubo x="2" y="0" z="3"/>
//! </cena>
//! ```
//!
//! Unknown attributes and elements are ignored. A `cubo` missing any of
//! `x`, `y`, `z`, or holding a value that is not a finite number, makes the
//! whole document malformed.

use super::{ObjectId, SceneError, SceneStore};
use crate::foundation::math::Vec3;
use crate::physics::PhysicsBridge;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Position of one cube at save time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubeRecord {
    /// X coordinate
    #[serde(rename = "@x")]
    pub x: f32,
    /// Y coordinate
    #[serde(rename = "@y")]
    pub y: f32,
    /// Z coordinate
    #[serde(rename = "@z")]
    pub z: f32,
}

impl CubeRecord {
    /// Record for `position`
    pub fn from_position(position: Vec3) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }

    /// Position held by the record
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Serialized scene
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "cena")]
pub struct SceneDocument {
    /// One record per object, in store order
    #[serde(rename = "cubo")]
    pub cubes: Vec<CubeRecord>,
}

// Attributes are read as text so missing and non-numeric values can be
// reported per record.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "cubo", default)]
    cubes: Vec<RawCube>,
}

#[derive(Debug, Deserialize)]
struct RawCube {
    #[serde(rename = "@x")]
    x: Option<String>,
    #[serde(rename = "@y")]
    y: Option<String>,
    #[serde(rename = "@z")]
    z: Option<String>,
}

fn coordinate(index: usize, axis: &str, raw: Option<&str>) -> Result<f32, SceneError> {
    let text = raw.ok_or_else(|| {
        SceneError::MalformedDocument(format!("cube {index} is missing coordinate '{axis}'"))
    })?;
    let value: f32 = text.trim().parse().map_err(|_| {
        SceneError::MalformedDocument(format!("cube {index} has non-numeric {axis}=\"{text}\""))
    })?;
    if !value.is_finite() {
        return Err(SceneError::MalformedDocument(format!(
            "cube {index} has non-finite {axis}=\"{text}\""
        )));
    }
    Ok(value)
}

impl SceneDocument {
    /// Snapshot the current positions of every object in `store`
    pub fn from_store(store: &SceneStore) -> Self {
        Self {
            cubes: store.iter().map(|object| CubeRecord::from_position(object.position)).collect(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    /// True when the document holds no records
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Validated positions in record order
    ///
    /// # Errors
    /// [`SceneError::MalformedDocument`] if any coordinate is NaN or infinite.
    pub fn positions(&self) -> Result<Vec<Vec3>, SceneError> {
        self.cubes
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let position = record.position();
                if position.iter().all(|v| v.is_finite()) {
                    Ok(position)
                } else {
                    Err(SceneError::MalformedDocument(format!(
                        "cube {index} has non-finite position {position:?}"
                    )))
                }
            })
            .collect()
    }

    /// Parse XML text
    ///
    /// # Errors
    /// [`SceneError::MalformedDocument`] on invalid XML or any bad record.
    pub fn from_xml_str(text: &str) -> Result<Self, SceneError> {
        let raw: RawDocument = quick_xml::de::from_str(text)
            .map_err(|e| SceneError::MalformedDocument(e.to_string()))?;

        let cubes = raw
            .cubes
            .iter()
            .enumerate()
            .map(|(index, cube)| {
                Ok(CubeRecord {
                    x: coordinate(index, "x", cube.x.as_deref())?,
                    y: coordinate(index, "y", cube.y.as_deref())?,
                    z: coordinate(index, "z", cube.z.as_deref())?,
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(Self { cubes })
    }

    /// Render as XML text
    ///
    /// # Errors
    /// [`SceneError::MalformedDocument`] if a position is not finite.
    pub fn to_xml_string(&self) -> Result<String, SceneError> {
        self.positions()?;
        quick_xml::se::to_string(self).map_err(|e| SceneError::MalformedDocument(e.to_string()))
    }

    /// Read and parse a document file
    ///
    /// # Errors
    /// [`SceneError::Io`] if the file cannot be read, otherwise as
    /// [`SceneDocument::from_xml_str`].
    pub fn read_from_path(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        let document = Self::from_xml_str(&text)?;
        log::debug!("Read {} cubes from {}", document.len(), path.display());
        Ok(document)
    }

    /// Write the document to `path`
    ///
    /// The text goes to a temporary file next to `path` which replaces the
    /// target only once fully written. On any error the target is untouched.
    ///
    /// # Errors
    /// [`SceneError::Io`] on file system failures.
    pub fn write_to_path(&self, path: &Path) -> Result<(), SceneError> {
        let text = self.to_xml_string()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(text.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| SceneError::Io(e.error))?;

        log::info!("Saved {} cubes to {}", self.len(), path.display());
        Ok(())
    }

    /// Replace the contents of `store` with this document's cubes
    ///
    /// All records are validated before anything changes. New objects are
    /// spawned alongside the existing ones; if any spawn fails the new ones
    /// are removed again and the store is left as it was. Only after every
    /// spawn succeeded are the previous objects removed.
    ///
    /// Returns the fresh ids in record order.
    ///
    /// # Errors
    /// [`SceneError::MalformedDocument`] or [`SceneError::SpawnFailed`].
    pub fn load_into(
        &self,
        store: &mut SceneStore,
        bridge: &mut PhysicsBridge,
    ) -> Result<Vec<ObjectId>, SceneError> {
        let positions = self.positions()?;
        let previous = store.ids();

        let mut staged = Vec::with_capacity(positions.len());
        for position in positions {
            match store.spawn(bridge, position) {
                Ok(id) => staged.push(id),
                Err(err) => {
                    log::warn!("Load aborted after {} of {} cubes; rolling back", staged.len(), self.len());
                    for id in staged {
                        store.remove(bridge, id);
                    }
                    return Err(err);
                }
            }
        }

        for id in previous {
            store.remove(bridge, id);
        }
        log::info!("Loaded {} cubes", staged.len());
        Ok(staged)
    }
}
