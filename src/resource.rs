/// The four entity types this tool manages. The kind decides which fields a
/// row must carry and which API endpoints it flows to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Mailbox,
    Alias,
    SyncJob,
    TransportMap,
}

impl ResourceKind {
    /// Fields that must be present and non-blank for a row to be submitted.
    ///
    /// Mailbox passwords are not listed here: they may be supplied or
    /// generated, and the pipeline handles that separately.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Mailbox => &["local_part"],
            ResourceKind::Alias => &["address", "goto"],
            ResourceKind::SyncJob => &["user1", "password1", "username"],
            ResourceKind::TransportMap => &["destination", "nexthop"],
        }
    }

    pub fn add_endpoint(self) -> &'static str {
        match self {
            ResourceKind::Mailbox => "add/mailbox",
            ResourceKind::Alias => "add/alias",
            ResourceKind::SyncJob => "add/syncjob",
            ResourceKind::TransportMap => "add/transport",
        }
    }

    pub fn edit_endpoint(self) -> &'static str {
        match self {
            ResourceKind::Mailbox => "edit/mailbox",
            ResourceKind::Alias => "edit/alias",
            ResourceKind::SyncJob => "edit/syncjob",
            ResourceKind::TransportMap => "edit/transport",
        }
    }

    pub fn delete_endpoint(self) -> &'static str {
        match self {
            ResourceKind::Mailbox => "delete/mailbox",
            ResourceKind::Alias => "delete/alias",
            ResourceKind::SyncJob => "delete/syncjob",
            ResourceKind::TransportMap => "delete/transport",
        }
    }

    /// Listing endpoint. Sync job logs can be large, so the API exposes a
    /// `no_log` variant which is the default here.
    pub fn list_endpoint(self, include_log: bool) -> &'static str {
        match self {
            ResourceKind::Mailbox => "get/mailbox/all",
            ResourceKind::Alias => "get/alias/all",
            ResourceKind::SyncJob => {
                if include_log {
                    "get/syncjobs/all"
                } else {
                    "get/syncjobs/all/no_log"
                }
            }
            ResourceKind::TransportMap => "get/transport/all",
        }
    }

    /// Human label used in messages ("Created: 3 mailbox(es)").
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Mailbox => "mailbox",
            ResourceKind::Alias => "alias",
            ResourceKind::SyncJob => "sync job",
            ResourceKind::TransportMap => "transport map",
        }
    }

    /// Columns shown for each entry when rendering a batch report.
    pub fn report_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Mailbox => &["local_part", "domain", "name", "password"],
            ResourceKind::Alias => &["address", "goto"],
            ResourceKind::SyncJob => &["user1", "host1", "username"],
            ResourceKind::TransportMap => &["destination", "nexthop", "username"],
        }
    }
}

/// imapsync best-practice defaults applied to every new sync job unless the
/// row or a CLI flag overrides them.
pub const SYNC_DEFAULTS: &[(&str, &str)] = &[
    ("port1", "993"),
    ("enc1", "SSL"),
    ("mins_interval", "20"),
    ("timeout1", "600"),
    ("timeout2", "600"),
    ("maxage", "0"),
    ("maxbytespersecond", "0"),
    ("exclude", "(?i)spam|(?i)junk"),
    ("delete1", "0"),
    ("delete2", "0"),
    ("delete2duplicates", "1"),
    ("automap", "1"),
    ("skipcrossduplicates", "0"),
    ("subscribeall", "1"),
    ("active", "1"),
];
