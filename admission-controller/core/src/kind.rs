use std::fmt;

/// The workload resource kinds that are scored on admission.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Pod,
    Deployment,
    DaemonSet,
    StatefulSet,
}

// === impl WorkloadKind ===

impl WorkloadKind {
    pub const ALL: [Self; 4] = [
        Self::Pod,
        Self::Deployment,
        Self::DaemonSet,
        Self::StatefulSet,
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::DaemonSet => "DaemonSet",
            Self::StatefulSet => "StatefulSet",
        }
    }

    /// The API group of the kind. Core resources have an empty group.
    pub fn group(&self) -> &'static str {
        match self {
            Self::Pod => "",
            Self::Deployment | Self::DaemonSet | Self::StatefulSet => "apps",
        }
    }

    pub fn api_version(&self) -> &'static str {
        match self {
            Self::Pod => "v1",
            Self::Deployment | Self::DaemonSet | Self::StatefulSet => "apps/v1",
        }
    }

    /// The HTTP path on which reviews for this kind are served.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Pod => "/pod",
            Self::Deployment => "/deployment",
            Self::DaemonSet => "/daemonset",
            Self::StatefulSet => "/statefulset",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.path() == path)
    }

    /// Matches a group/kind pair as reported by the API server on an
    /// admission request. Kinds are compared case-insensitively.
    pub fn from_group_kind(group: &str, kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| {
            k.group().eq_ignore_ascii_case(group) && k.kind().eq_ignore_ascii_case(kind)
        })
    }

    /// A lowercase label suitable for metrics and log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::DaemonSet => "daemonset",
            Self::StatefulSet => "statefulset",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
