//! Background voxelization.
//!
//! A [`VoxelizeJob`] runs [`Voxelizer::voxelize_asset`] on a worker thread.
//! The render thread polls [`VoxelizeJob::is_finished`] and uploads the
//! volumes after [`VoxelizeJob::join`], so upload always happens after
//! voxelization completes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use volscope_core::{CancelToken, DenseVolume, GridAsset, Result, VolscopeError, Voxelizer};

/// A voxelization running on its own thread.
#[derive(Debug)]
pub struct VoxelizeJob {
    handle: Option<JoinHandle<Result<Vec<DenseVolume>>>>,
    cancel: CancelToken,
    asset: Arc<GridAsset>,
}

impl VoxelizeJob {
    /// Starts voxelizing every grid of `asset`.
    ///
    /// Any cancel token already attached to `voxelizer` is replaced by the
    /// job's own.
    pub fn spawn(asset: Arc<GridAsset>, voxelizer: Voxelizer) -> Self {
        let cancel = CancelToken::new();
        let worker_voxelizer = voxelizer.with_cancel_token(cancel.clone());
        let worker_asset = Arc::clone(&asset);
        log::debug!(
            "spawning voxelization of {} grids at {}^3",
            asset.grid_count(),
            worker_voxelizer.resolution()
        );
        let handle = thread::spawn(move || worker_voxelizer.voxelize_asset(&worker_asset));
        Self {
            handle: Some(handle),
            cancel,
            asset,
        }
    }

    /// Returns the asset being voxelized.
    pub fn asset(&self) -> &GridAsset {
        &self.asset
    }

    /// Returns true once the worker has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Asks the worker to stop at the next row boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the worker and returns one volume per grid.
    pub fn join(mut self) -> Result<Vec<DenseVolume>> {
        let handle = self.handle.take().ok_or(VolscopeError::WorkerPanicked)?;
        handle.join().map_err(|_| VolscopeError::WorkerPanicked)?
    }
}

impl Drop for VoxelizeJob {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
