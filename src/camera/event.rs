//! Raw availability events delivered by the camera service.

use serde::{Deserialize, Serialize};

/// A single availability report from the camera hardware layer.
///
/// The serialized form is internally tagged by `kind`, which is also the
/// format used by event scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraEvent {
    /// A logical camera was closed by its client.
    CameraClosed { logical_id: String },
    /// A logical camera was opened by `package_id`.
    CameraOpened {
        logical_id: String,
        package_id: String,
    },
    /// A physical sensor behind `logical_id` became usable again.
    PhysicalCameraAvailable {
        logical_id: String,
        physical_id: String,
    },
    /// A physical sensor behind `logical_id` stopped being usable.
    PhysicalCameraUnavailable {
        logical_id: String,
        physical_id: String,
    },
}

impl CameraEvent {
    pub fn closed(logical_id: impl Into<String>) -> Self {
        Self::CameraClosed {
            logical_id: logical_id.into(),
        }
    }

    pub fn opened(logical_id: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self::CameraOpened {
            logical_id: logical_id.into(),
            package_id: package_id.into(),
        }
    }

    pub fn physical_available(
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
    ) -> Self {
        Self::PhysicalCameraAvailable {
            logical_id: logical_id.into(),
            physical_id: physical_id.into(),
        }
    }

    pub fn physical_unavailable(
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
    ) -> Self {
        Self::PhysicalCameraUnavailable {
            logical_id: logical_id.into(),
            physical_id: physical_id.into(),
        }
    }

    /// Logical camera the event refers to.
    pub fn logical_id(&self) -> &str {
        match self {
            Self::CameraClosed { logical_id }
            | Self::CameraOpened { logical_id, .. }
            | Self::PhysicalCameraAvailable { logical_id, .. }
            | Self::PhysicalCameraUnavailable { logical_id, .. } => logical_id,
        }
    }

    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CameraClosed { .. } => "camera_closed",
            Self::CameraOpened { .. } => "camera_opened",
            Self::PhysicalCameraAvailable { .. } => "physical_camera_available",
            Self::PhysicalCameraUnavailable { .. } => "physical_camera_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_event() {
        let event: CameraEvent = toml::from_str(
            r#"
            kind = "camera_opened"
            logical_id = "0"
            package_id = "com.example.app"
            "#,
        )
        .unwrap();

        assert_eq!(event, CameraEvent::opened("0", "com.example.app"));
        assert_eq!(event.kind(), "camera_opened");
        assert_eq!(event.logical_id(), "0");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<CameraEvent, _> = toml::from_str(
            r#"
            kind = "camera_exploded"
            logical_id = "0"
            "#,
        );
        assert!(result.is_err());
    }
}
