use crossbeam_channel::Receiver;
use tracing::debug;

use crate::{
    labels, resolve_all, ClearGate, ConfirmationRequest, DisplayRecord, GateOutcome, IgnoreList,
    Navigator, OpenOutcome, ProfileCache, ProfileFetcher, ProfileOpener, Result, SettingsChange,
    SettingsFlag, SettingsHandler, UserId,
};

/// Host collaborators the settings surface needs to open profiles.
pub struct Host<'a> {
    pub cache: &'a dyn ProfileCache,
    pub fetcher: &'a dyn ProfileFetcher,
    pub navigator: &'a mut dyn Navigator,
}

/// Events coming from the settings surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreSettingsAction {
    Toggle(SettingsFlag, bool),
    AddUser(UserId),
    RemoveUser(UserId),
    /// The clear row was pressed; opens the confirmation when there is
    /// something to clear.
    PressClear,
    /// The confirmation dialog was answered.
    AnswerClear(bool),
    OpenUser(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResponse {
    /// Whether the store changed.
    Updated(bool),
    Confirm(ConfirmationRequest),
    Gate(GateOutcome),
    Opened(OpenOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Switch {
        flag: SettingsFlag,
        label: &'static str,
        value: bool,
    },
    Info {
        label: &'static str,
        subtitle: &'static str,
    },
    ClearUsers {
        label: String,
    },
    User {
        record: DisplayRecord,
        remove_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

fn flag_label(flag: SettingsFlag) -> &'static str {
    match flag {
        SettingsFlag::Timestamps => labels::SHOW_TIMESTAMPS,
        SettingsFlag::EditedFormat => labels::EW_TIMESTAMP_FORMAT,
        SettingsFlag::IgnoreBots => labels::IGNORE_BOTS,
    }
}

/// The ignore-list settings surface, independent of how it gets drawn.
///
/// Holds a read-only mirror of the stored ignore list. The mirror only moves
/// when the store announces a committed change, so it never runs ahead of
/// what is on disk.
pub struct IgnoreSettingsView {
    users: IgnoreList,
    changes: Receiver<SettingsChange>,
    gate: ClearGate,
    opener: ProfileOpener,
}

impl IgnoreSettingsView {
    pub fn new(settings: &mut SettingsHandler) -> Self {
        Self {
            users: settings.ignored_users().clone(),
            changes: settings.subscribe(),
            gate: ClearGate::new(),
            opener: ProfileOpener::new(),
        }
    }

    pub fn users(&self) -> &IgnoreList {
        &self.users
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmationRequest> {
        self.gate.pending()
    }

    pub fn opener(&self) -> &ProfileOpener {
        &self.opener
    }

    /// Pull committed changes from the store into the mirror.
    pub fn sync(&mut self) {
        for change in self.changes.try_iter() {
            if let SettingsChange::IgnoredUsers(users) = change {
                self.users = users;
            }
        }
    }

    /// Poll pending profile fetches. Call once per frame.
    pub fn poll(&mut self, navigator: &mut dyn Navigator) -> usize {
        self.opener.process(navigator)
    }

    pub fn process(
        &mut self,
        action: IgnoreSettingsAction,
        settings: &mut SettingsHandler,
        host: &mut Host<'_>,
    ) -> Result<ActionResponse> {
        debug!("processing {:?}", action);
        self.sync();

        let response = match action {
            IgnoreSettingsAction::Toggle(flag, value) => {
                ActionResponse::Updated(settings.set_flag(flag, value)?)
            }
            IgnoreSettingsAction::AddUser(id) => {
                ActionResponse::Updated(settings.add_ignored_user(id)?)
            }
            IgnoreSettingsAction::RemoveUser(id) => {
                ActionResponse::Updated(settings.remove_ignored_user(&id)?)
            }
            IgnoreSettingsAction::PressClear => match self.gate.trigger(self.users.len()) {
                Some(request) => ActionResponse::Confirm(request.clone()),
                None => ActionResponse::Updated(false),
            },
            IgnoreSettingsAction::AnswerClear(confirmed) => {
                ActionResponse::Gate(
                    self.gate
                        .answer(confirmed, || settings.clear_ignored_users())?,
                )
            }
            IgnoreSettingsAction::OpenUser(id) => ActionResponse::Opened(self.opener.open(
                &id,
                host.cache,
                host.fetcher,
                &mut *host.navigator,
            )),
        };

        self.sync();
        Ok(response)
    }

    /// Build the page for one render pass.
    pub fn render(&mut self, settings: &SettingsHandler, cache: &dyn ProfileCache) -> Vec<Section> {
        self.sync();

        let mut general: Vec<Row> = [SettingsFlag::Timestamps, SettingsFlag::EditedFormat]
            .into_iter()
            .map(|flag| Row::Switch {
                flag,
                label: flag_label(flag),
                value: settings.flag(flag),
            })
            .collect();
        general.push(Row::Info {
            label: labels::YOU_DELETED_IT_WARNING,
            subtitle: labels::YOU_DELETED_IT_SUBTITLE,
        });

        let filters = vec![
            Row::Switch {
                flag: SettingsFlag::IgnoreBots,
                label: flag_label(SettingsFlag::IgnoreBots),
                value: settings.ignore_bots(),
            },
            Row::ClearUsers {
                label: labels::clear_users_label(self.users.len()),
            },
        ];

        let mut ignored: Vec<Row> = resolve_all(&self.users, cache)
            .records
            .into_iter()
            .map(|record| Row::User {
                record,
                remove_label: labels::REMOVE_USER,
            })
            .collect();
        ignored.push(Row::Info {
            label: labels::ADD_USERS_INFO,
            subtitle: labels::ADD_USERS_SUBTITLE,
        });

        vec![
            Section {
                title: labels::SETTINGS_TITLE,
                rows: general,
            },
            Section {
                title: labels::FILTERS_TITLE,
                rows: filters,
            },
            Section {
                title: labels::IGNORED_USERS_TITLE,
                rows: ignored,
            },
        ]
    }
}
