//! Background cube-map loading.
//!
//! Face decoding runs on worker threads; the render thread submits requests
//! once and collects finished sets each tick with
//! [`drain_completed`](CubeMapLoader::drain_completed). It never waits.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use crate::{CubeMapError, CubeMapSet, load_cube_map};

/// Which material binding a cube map feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeMapSlot {
    /// Displacement source, also drawn as the background.
    Height,
    Normal,
    /// Biome / color modulation.
    Color,
}

/// One face set to load.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub slot: CubeMapSlot,
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
}

/// A finished load, possibly with some faces missing.
#[derive(Debug)]
pub struct LoadedCubeMap {
    pub slot: CubeMapSlot,
    pub set: CubeMapSet,
    pub failures: Vec<CubeMapError>,
}

/// Loads face sets on a small pool of named worker threads.
pub struct CubeMapLoader {
    request_sender: Option<crossbeam_channel::Sender<LoadRequest>>,
    result_receiver: crossbeam_channel::Receiver<LoadedCubeMap>,
    worker_handles: Vec<JoinHandle<()>>,
    pending: Arc<AtomicUsize>,
}

impl CubeMapLoader {
    /// Spawn `worker_count` loader threads (at least one).
    pub fn new(worker_count: usize) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let pending = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..worker_count.max(1) {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("cubemap-loader-{i}"))
                .spawn(move || {
                    while let Ok(request) = rx.recv() {
                        let report =
                            load_cube_map(&request.directory, &request.prefix, &request.extension);
                        let _ = tx.send(LoadedCubeMap {
                            slot: request.slot,
                            set: report.set,
                            failures: report.failures,
                        });
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::error!("Failed to spawn cube map loader thread: {err}"),
            }
        }

        Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            pending,
        }
    }

    /// Queue a load. Returns `false` if the loader has been shut down or
    /// has no workers.
    pub fn submit(&self, request: LoadRequest) -> bool {
        let Some(sender) = &self.request_sender else {
            return false;
        };
        if self.worker_handles.is_empty() {
            return false;
        }
        tracing::debug!(
            "Queued {:?} cube map '{}' from {}",
            request.slot,
            request.prefix,
            request.directory.display()
        );
        self.pending.fetch_add(1, Ordering::Relaxed);
        if sender.send(request).is_err() {
            self.pending.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Take every load that has finished since the last call.
    pub fn drain_completed(&self) -> Vec<LoadedCubeMap> {
        let mut completed = Vec::new();
        while let Ok(loaded) = self.result_receiver.try_recv() {
            completed.push(loaded);
        }
        if !completed.is_empty() {
            self.pending.fetch_sub(completed.len(), Ordering::Relaxed);
        }
        completed
    }

    /// Loads submitted but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// Close the request channel and join the workers.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for CubeMapLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use glam::{Vec3, Vec4};

    use crate::test_support::save_cube_map;
    use crate::{CubeFace, Filter};

    fn wait_for(loader: &CubeMapLoader, count: usize) -> Vec<LoadedCubeMap> {
        let start = Instant::now();
        let mut received = Vec::new();
        while received.len() < count {
            received.extend(loader.drain_completed());
            assert!(start.elapsed().as_secs() < 5, "Timed out waiting for loads");
            std::thread::sleep(Duration::from_millis(1));
        }
        received
    }

    fn request(slot: CubeMapSlot, dir: &std::path::Path, prefix: &str) -> LoadRequest {
        LoadRequest {
            slot,
            directory: dir.to_path_buf(),
            prefix: prefix.to_string(),
            extension: "png".to_string(),
        }
    }

    #[test]
    fn test_completed_load_arrives_via_drain() {
        let tmp = tempfile::tempdir().unwrap();
        let green = Vec4::new(0.0, 1.0, 0.0, 1.0);
        save_cube_map(&CubeMapSet::solid(4, green), tmp.path(), "face");

        let loader = CubeMapLoader::new(1);
        assert!(loader.submit(request(CubeMapSlot::Height, tmp.path(), "face")));

        let loaded = wait_for(&loader, 1);
        assert_eq!(loaded[0].slot, CubeMapSlot::Height);
        assert!(loaded[0].failures.is_empty());
        assert_eq!(loaded[0].set.sample(Vec3::NEG_Z, Filter::Nearest), green);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_drain_does_not_block_when_nothing_finished() {
        let loader = CubeMapLoader::new(1);
        let start = Instant::now();
        assert!(loader.drain_completed().is_empty());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_each_slot_is_delivered_once() {
        let tmp = tempfile::tempdir().unwrap();
        save_cube_map(&CubeMapSet::solid(2, Vec4::ONE), tmp.path(), "face");
        save_cube_map(&CubeMapSet::solid(2, Vec4::ONE), tmp.path(), "normal_face");

        let loader = CubeMapLoader::new(2);
        loader.submit(request(CubeMapSlot::Height, tmp.path(), "face"));
        loader.submit(request(CubeMapSlot::Normal, tmp.path(), "normal_face"));
        // Nothing on disk for this one; it still completes, with every face missing.
        loader.submit(request(CubeMapSlot::Color, tmp.path(), "biome_face"));

        let mut loaded = wait_for(&loader, 3);
        loaded.sort_by_key(|l| l.slot as u8);
        let slots: Vec<_> = loaded.iter().map(|l| l.slot).collect();
        assert_eq!(slots, [CubeMapSlot::Height, CubeMapSlot::Normal, CubeMapSlot::Color]);
        assert!(loaded[2].set.is_empty());
        assert_eq!(loaded[2].failures.len(), 6);
        assert!(loaded[2].failures.iter().any(|e| e.face() == CubeFace::PosX));
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let mut loader = CubeMapLoader::new(1);
        loader.shutdown();
        let tmp = tempfile::tempdir().unwrap();
        assert!(!loader.submit(request(CubeMapSlot::Height, tmp.path(), "face")));
    }
}
