//! Weapon model loading.
//!
//! Models are read from glTF/GLB files on background threads. Each load is
//! attempted once; the caller polls for outcomes and picks a fallback for any
//! failure, including loads that outlive the timeout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use glam::{Mat4, Vec3};

use crate::weapon::WeaponKind;

/// Error type for asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Missing position data for mesh: {0}")]
    MissingPositions(String),

    #[error("Loading {path} did not finish within {after:?}")]
    Timeout { path: String, after: Duration },

    #[error("Asset worker exited without a result")]
    Disconnected,
}

/// Triangle mesh with transforms already applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Base color (sRGB).
    pub color: [u8; 3],
}

/// A loaded model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Total vertex count across meshes.
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}

/// Somewhere models can be fetched from.
pub trait AssetSource: Send + Sync + 'static {
    /// Load the model at `path`. Blocking.
    fn fetch(&self, path: &str) -> Result<ModelData, AssetError>;
}

/// Reads `.glb`/`.gltf` files relative to a root directory.
#[derive(Debug, Clone)]
pub struct GltfAssetSource {
    root: PathBuf,
}

impl GltfAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for GltfAssetSource {
    fn fetch(&self, path: &str) -> Result<ModelData, AssetError> {
        let full_path = self.root.join(path);
        let (document, buffers, _images) = gltf::import(&full_path)?;

        let mut meshes = Vec::new();
        for scene in document.scenes() {
            for node in scene.nodes() {
                process_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }

        tracing::debug!(
            "Loaded model {}: {} meshes",
            full_path.display(),
            meshes.len()
        );

        Ok(ModelData { meshes })
    }
}

/// Flatten a node and its children into world-space meshes.
fn process_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) -> Result<(), AssetError> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed").to_string();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingPositions(name.clone()))?
                .map(|p| transform.transform_point3(Vec3::from(p)))
                .collect();

            // Flat up-normals when the file has none
            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|iter| {
                    iter.map(|n| transform.transform_vector3(Vec3::from(n)).normalize_or_zero())
                        .collect()
                })
                .unwrap_or_else(|| vec![Vec3::Y; positions.len()]);

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            meshes.push(MeshData {
                name: name.clone(),
                positions,
                normals,
                indices,
                color: [
                    (color[0] * 255.0) as u8,
                    (color[1] * 255.0) as u8,
                    (color[2] * 255.0) as u8,
                ],
            });
        }
    }

    for child in node.children() {
        process_node(&child, transform, buffers, meshes)?;
    }

    Ok(())
}

/// Result of one weapon's load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub kind: WeaponKind,
    pub result: Result<ModelData, AssetError>,
}

struct PendingLoad {
    path: String,
    deadline: Instant,
}

/// Background model loader.
///
/// Each [`request`](Self::request) spawns one worker thread. Results arrive
/// over a channel and are handed out by [`poll`](Self::poll).
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    timeout: Duration,
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
    pending: HashMap<WeaponKind, PendingLoad>,
    ready: Vec<LoadOutcome>,
    workers: Vec<(WeaponKind, JoinHandle<()>)>,
}

impl AssetLoader {
    const REAP_INTERVAL: Duration = Duration::from_millis(25);

    /// Create a loader. Nothing is loaded until requested.
    pub fn new(source: Arc<dyn AssetSource>, timeout: Duration) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            source,
            timeout,
            sender,
            receiver,
            pending: HashMap::new(),
            ready: Vec::new(),
            workers: Vec::new(),
        }
    }

    /// Start loading a weapon's model.
    ///
    /// A second request for a weapon that is still pending is ignored.
    pub fn request(&mut self, kind: WeaponKind, path: &str) {
        if self.pending.contains_key(&kind) {
            return;
        }

        let sender = self.sender.clone();
        let source = Arc::clone(&self.source);
        let owned_path = path.to_string();
        let spawned = std::thread::Builder::new()
            .name(format!("asset-{}", kind.name()))
            .spawn(move || {
                let result = source.fetch(&owned_path);
                // Receiver gone means the loader was dropped; nothing to report to
                let _ = sender.send(LoadOutcome { kind, result });
            });

        match spawned {
            Ok(handle) => {
                self.workers.push((kind, handle));
                self.pending.insert(
                    kind,
                    PendingLoad {
                        path: path.to_string(),
                        deadline: Instant::now() + self.timeout,
                    },
                );
                tracing::debug!("Loading {} model from {}", kind.name(), path);
            }
            Err(err) => self.ready.push(LoadOutcome {
                kind,
                result: Err(AssetError::Io(err)),
            }),
        }
    }

    /// Whether any load is still outstanding.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty() || !self.ready.is_empty()
    }

    /// Collect finished loads without blocking.
    ///
    /// Loads past their deadline resolve to [`AssetError::Timeout`]; a result
    /// arriving after that is discarded.
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = std::mem::take(&mut self.ready);

        while let Ok(outcome) = self.receiver.try_recv() {
            self.accept(outcome, &mut outcomes);
        }

        self.reap_workers(&mut outcomes);
        self.expire(Instant::now(), &mut outcomes);
        outcomes
    }

    /// Block until every pending load has resolved or timed out.
    pub fn wait(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = std::mem::take(&mut self.ready);

        while let Some(deadline) = self.pending.values().map(|p| p.deadline).min() {
            // Wake periodically so a crashed worker is noticed before its deadline
            let wake = deadline.min(Instant::now() + Self::REAP_INTERVAL);
            if let Ok(outcome) = self.receiver.recv_deadline(wake) {
                self.accept(outcome, &mut outcomes);
            }
            self.reap_workers(&mut outcomes);
            self.expire(Instant::now(), &mut outcomes);
        }

        outcomes
    }

    fn accept(&mut self, outcome: LoadOutcome, outcomes: &mut Vec<LoadOutcome>) {
        if self.pending.remove(&outcome.kind).is_some() {
            outcomes.push(outcome);
        } else {
            tracing::debug!("Discarding late {} model", outcome.kind.name());
        }
    }

    fn expire(&mut self, now: Instant, outcomes: &mut Vec<LoadOutcome>) {
        let expired: Vec<WeaponKind> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(kind, _)| *kind)
            .collect();

        for kind in expired {
            if let Some(load) = self.pending.remove(&kind) {
                outcomes.push(LoadOutcome {
                    kind,
                    result: Err(AssetError::Timeout {
                        path: load.path,
                        after: self.timeout,
                    }),
                });
            }
        }
    }

    /// Join finished workers. One that died without sending a result
    /// resolves its load to [`AssetError::Disconnected`].
    fn reap_workers(&mut self, outcomes: &mut Vec<LoadOutcome>) {
        let (finished, running): (Vec<_>, Vec<_>) =
            self.workers.drain(..).partition(|(_, w)| w.is_finished());
        self.workers = running;

        for (kind, worker) in finished {
            if worker.join().is_ok() {
                continue;
            }
            tracing::warn!("Asset worker for {} panicked", kind.name());
            // A result sent before the panic is already in the channel
            while let Ok(outcome) = self.receiver.try_recv() {
                self.accept(outcome, outcomes);
            }
            if self.pending.remove(&kind).is_some() {
                outcomes.push(LoadOutcome {
                    kind,
                    result: Err(AssetError::Disconnected),
                });
            }
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        for (_, worker) in self.workers.drain(..) {
            if worker.is_finished() {
                let _ = worker.join();
            } else {
                // Still blocked in a fetch; its send fails once we are gone
                tracing::debug!("Detaching unfinished asset worker");
            }
        }
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("timeout", &self.timeout)
            .field("pending", &self.pending.len())
            .field("workers", &self.workers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource;

    impl AssetSource for FixedSource {
        fn fetch(&self, path: &str) -> Result<ModelData, AssetError> {
            if path.contains("missing") {
                return Err(AssetError::MissingPositions(path.to_string()));
            }
            Ok(ModelData {
                meshes: vec![MeshData {
                    name: path.to_string(),
                    positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                    normals: vec![Vec3::Z; 3],
                    indices: vec![0, 1, 2],
                    color: [255, 255, 255],
                }],
            })
        }
    }

    struct SlowSource(Duration);

    impl AssetSource for SlowSource {
        fn fetch(&self, _path: &str) -> Result<ModelData, AssetError> {
            std::thread::sleep(self.0);
            Ok(ModelData::default())
        }
    }

    struct PanickingSource;

    impl AssetSource for PanickingSource {
        fn fetch(&self, _path: &str) -> Result<ModelData, AssetError> {
            panic!("decoder blew up");
        }
    }

    fn find(outcomes: &[LoadOutcome], kind: WeaponKind) -> &LoadOutcome {
        outcomes.iter().find(|o| o.kind == kind).expect("outcome for kind")
    }

    #[test]
    fn test_loads_succeed_and_fail_independently() {
        let mut loader = AssetLoader::new(Arc::new(FixedSource), Duration::from_secs(5));
        loader.request(WeaponKind::Pistol, "models/pistol.glb");
        loader.request(WeaponKind::Rifle, "models/missing.glb");
        assert!(loader.is_pending());

        let outcomes = loader.wait();
        assert_eq!(outcomes.len(), 2);

        let pistol = find(&outcomes, WeaponKind::Pistol);
        assert_eq!(pistol.result.as_ref().map(|m| m.vertex_count()).ok(), Some(3));

        let rifle = find(&outcomes, WeaponKind::Rifle);
        assert!(matches!(rifle.result, Err(AssetError::MissingPositions(_))));

        assert!(!loader.is_pending());
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn test_timeout() {
        let mut loader = AssetLoader::new(
            Arc::new(SlowSource(Duration::from_secs(5))),
            Duration::from_millis(20),
        );
        loader.request(WeaponKind::Rifle, "models/rifle.glb");

        let started = Instant::now();
        let outcomes = loader.wait();
        assert!(started.elapsed() < Duration::from_secs(5));

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].result,
            Err(AssetError::Timeout { ref path, .. }) if path == "models/rifle.glb"
        ));
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_poll_before_completion_is_empty() {
        let mut loader = AssetLoader::new(
            Arc::new(SlowSource(Duration::from_millis(200))),
            Duration::from_secs(5),
        );
        loader.request(WeaponKind::Pistol, "models/pistol.glb");
        assert!(loader.poll().is_empty());
        assert!(loader.is_pending());
    }

    #[test]
    fn test_duplicate_request_ignored() {
        let mut loader = AssetLoader::new(Arc::new(FixedSource), Duration::from_secs(5));
        loader.request(WeaponKind::Pistol, "models/pistol.glb");
        loader.request(WeaponKind::Pistol, "models/pistol.glb");
        assert_eq!(loader.wait().len(), 1);
    }

    #[test]
    fn test_worker_panic_reports_disconnected() {
        let started = Instant::now();
        let mut loader = AssetLoader::new(Arc::new(PanickingSource), Duration::from_secs(5));
        loader.request(WeaponKind::Pistol, "models/pistol.glb");

        let outcomes = loader.wait();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Err(AssetError::Disconnected)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_drop_with_pending_load_returns() {
        let started = Instant::now();
        {
            let mut loader = AssetLoader::new(
                Arc::new(SlowSource(Duration::from_secs(2))),
                Duration::from_secs(10),
            );
            loader.request(WeaponKind::Rifle, "models/rifle.glb");
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_gltf_source_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = GltfAssetSource::new(dir.path());
        assert!(matches!(
            source.fetch("nope.glb"),
            Err(AssetError::Gltf(_)) | Err(AssetError::Io(_))
        ));
    }

    #[test]
    fn test_gltf_source_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.glb"), b"not a gltf").expect("write");
        let source = GltfAssetSource::new(dir.path());
        assert!(source.fetch("broken.glb").is_err());
    }
}
