//! Background boolean worker
//!
//! Runs the kernel step of a prepared boolean job on its own thread. The
//! result is handed back through a shared status slot that the editor polls.

use std::sync::Arc;
use std::thread::JoinHandle;

use forge_csg::TriangleMesh;
use parking_lot::Mutex;

use crate::boolean::{BooleanError, BooleanJob};

/// Boolean job state
#[derive(Debug, Clone, Default)]
pub enum BooleanStatus {
    /// Kernel still running
    #[default]
    Running,
    /// Kernel finished
    Finished(Result<TriangleMesh, BooleanError>),
}

/// Shared boolean job status
pub type SharedBooleanStatus = Arc<Mutex<BooleanStatus>>;

/// Create a new shared status in the running state
pub fn create_boolean_status() -> SharedBooleanStatus {
    Arc::new(Mutex::new(BooleanStatus::Running))
}

/// Compute `job` in the background, publishing the result to `status`
pub fn spawn_boolean(job: Arc<BooleanJob>, status: SharedBooleanStatus) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = job.compute();
        if let Err(e) = &result {
            tracing::warn!("Background {} failed: {}", job.op().display_name(), e);
        }
        *status.lock() = BooleanStatus::Finished(result);
    })
}

/// Take a finished result out of `status`, leaving it running-empty
pub fn take_finished(status: &SharedBooleanStatus) -> Option<Result<TriangleMesh, BooleanError>> {
    let mut guard = status.lock();
    match std::mem::take(&mut *guard) {
        BooleanStatus::Finished(result) => Some(result),
        BooleanStatus::Running => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::{BooleanType, prepare};
    use crate::config::TessellationConfig;
    use crate::node::{PrimitiveKind, SceneNode};
    use glam::DVec3;

    #[test]
    fn test_worker_publishes_result() {
        let a = SceneNode::primitive(PrimitiveKind::Box, "A");
        let b = SceneNode::primitive(PrimitiveKind::Box, "B").with_position(DVec3::X * 0.5);
        let job = Arc::new(
            prepare(&a, &b, BooleanType::Union, &TessellationConfig::default()).unwrap(),
        );

        let status = create_boolean_status();
        spawn_boolean(job.clone(), status.clone()).join().unwrap();

        let mesh = take_finished(&status).unwrap().unwrap();
        assert!(job.finish(mesh).is_ok());
        assert!(take_finished(&status).is_none());
    }
}
