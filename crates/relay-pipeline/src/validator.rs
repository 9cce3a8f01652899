//! Pre-flight validation of configured source channels.

use std::collections::{HashMap, HashSet};

use relay_core::{ChannelDirectory, ChannelInfo, ChannelRef, ValidationError};
use tracing::{error, info, warn};

/// Validated source channels keyed by chat id. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct MonitoredChannels {
    channels: HashMap<i64, ChannelInfo>,
}

impl MonitoredChannels {
    pub fn contains(&self, chat_id: i64) -> bool {
        self.channels.contains_key(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelInfo> {
        self.channels.values()
    }
}

impl FromIterator<ChannelInfo> for MonitoredChannels {
    fn from_iter<T: IntoIterator<Item = ChannelInfo>>(iter: T) -> Self {
        Self {
            channels: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub monitored: MonitoredChannels,
    pub rejected: Vec<(ChannelRef, ValidationError)>,
}

/// Resolves every configured channel, one at a time. Invalid entries are logged and excluded;
/// duplicates (by reference or resolved id) are validated once.
///
/// Returns [`ValidationError::NoValidChannels`] when nothing could be resolved.
pub async fn validate_channels(
    directory: &dyn ChannelDirectory,
    configured: &[ChannelRef],
) -> Result<ValidationReport, ValidationError> {
    info!(count = configured.len(), "Validating channels");

    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for channel in configured {
        if !seen.insert(channel.clone()) {
            continue;
        }
        match directory.resolve(channel).await {
            Ok(info) => {
                info!(channel = %channel, chat_id = info.id, "Channel validated");
                valid.push(info);
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "Channel is invalid or unreachable");
                rejected.push((channel.clone(), e));
            }
        }
    }

    if !rejected.is_empty() {
        let skipped: Vec<String> = rejected.iter().map(|(c, _)| c.to_string()).collect();
        warn!(channels = %skipped.join(", "), "Skipping channels");
    }

    let monitored: MonitoredChannels = valid.into_iter().collect();
    if monitored.is_empty() {
        error!(attempted = seen.len(), "No valid channels to monitor");
        return Err(ValidationError::NoValidChannels {
            attempted: seen.len(),
        });
    }

    info!(count = monitored.len(), "Monitoring channels");
    Ok(ValidationReport {
        monitored,
        rejected,
    })
}
