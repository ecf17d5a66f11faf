use poll_promise::Promise;
use tracing::{debug, error};

use crate::{Profile, ProfileCache, Result, UserId};

pub type FetchingProfile = Promise<Result<Profile>>;

/// Host identity service. Slow and fallible; implementations must always
/// complete the promise they hand out.
pub trait ProfileFetcher {
    fn fetch_profile(&self, id: &UserId) -> FetchingProfile;
}

/// Host navigation service.
pub trait Navigator {
    fn show_profile(&mut self, id: &UserId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The user was cached and the profile is already showing.
    Shown,
    /// A fetch was started; the profile shows once it lands.
    Fetching,
    /// A fetch for this user is already in flight.
    AlreadyFetching,
}

struct InFlightFetch {
    id: UserId,
    promise: FetchingProfile,
}

/// Opens user profiles from the ignore list, fetching users the cache
/// does not know yet.
///
/// Fetched profiles are only navigated to; they never update rows that were
/// already resolved in the current pass. Dropping the opener drops any
/// pending navigation.
#[derive(Default)]
pub struct ProfileOpener {
    in_flight: Vec<InFlightFetch>,
}

impl ProfileOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &mut self,
        id: &UserId,
        cache: &dyn ProfileCache,
        fetcher: &dyn ProfileFetcher,
        navigator: &mut dyn Navigator,
    ) -> OpenOutcome {
        if cache.lookup_cached(id).is_some() {
            navigator.show_profile(id);
            return OpenOutcome::Shown;
        }

        if self.is_fetching(id) {
            return OpenOutcome::AlreadyFetching;
        }

        debug!("fetching uncached profile {id}");
        self.in_flight.push(InFlightFetch {
            id: id.clone(),
            promise: fetcher.fetch_profile(id),
        });

        OpenOutcome::Fetching
    }

    pub fn is_fetching(&self, id: &UserId) -> bool {
        self.in_flight.iter().any(|fetch| &fetch.id == id)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Poll in-flight fetches once, navigating for each one that resolved.
    /// Returns how many profiles were shown.
    pub fn process(&mut self, navigator: &mut dyn Navigator) -> usize {
        let mut shown = 0;

        for i in (0..self.in_flight.len()).rev() {
            if self.in_flight[i].promise.ready().is_none() {
                continue;
            }

            let InFlightFetch { id, promise } = self.in_flight.remove(i);
            match promise.block_and_take() {
                Ok(profile) => {
                    navigator.show_profile(&profile.id);
                    shown += 1;
                }
                Err(err) => error!("could not fetch profile {id}: {err}"),
            }
        }

        shown
    }
}
