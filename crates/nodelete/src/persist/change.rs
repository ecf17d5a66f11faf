use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{IgnoreList, SettingsFlag};

/// Pushed to subscribers after a change has been written to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    Flag(SettingsFlag, bool),
    IgnoredUsers(IgnoreList),
}

#[derive(Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<SettingsChange>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<SettingsChange> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    /// Fan a change out to every live subscriber, forgetting dropped receivers.
    pub fn notify(&mut self, change: &SettingsChange) {
        self.senders.retain(|tx| tx.send(change.clone()).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
