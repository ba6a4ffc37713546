use crate::models::{FilterKind, FilterState, Job};

/// Full job set plus the indices that pass the active filters.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Vec<Job>,
    filters: FilterState,
    visible: Vec<usize>,
}

impl JobStore {
    pub fn new(jobs: Vec<Job>, filters: FilterState) -> Self {
        let mut store = Self {
            jobs,
            filters,
            visible: Vec::new(),
        };
        store.recompute();
        store
    }

    pub fn filters(&self) -> FilterState {
        self.filters
    }

    pub fn toggle(&mut self, kind: FilterKind) {
        self.filters.toggle(kind);
        self.recompute();
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible(&self, index: usize) -> Option<&Job> {
        self.visible.get(index).map(|&i| &self.jobs[i])
    }

    pub fn visible_jobs(&self) -> impl Iterator<Item = &Job> + '_ {
        self.visible.iter().map(|&i| &self.jobs[i])
    }

    fn recompute(&mut self) {
        self.visible = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| self.filters.matches(job))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            total = self.jobs.len(),
            visible = self.visible.len(),
            filters = ?self.filters,
            "recomputed visible jobs"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, us: bool, remote: bool, visa: bool) -> Job {
        Job {
            id: id.to_string(),
            user: "u".to_string(),
            age: "1 hours ago".to_string(),
            header: id.to_string(),
            company: id.to_string(),
            location: "Unknown".to_string(),
            url: None,
            content: format!("{} body", id),
            is_us_only: us,
            is_remote: remote,
            is_visa: visa,
            source_line: 0,
        }
    }

    fn sample() -> Vec<Job> {
        vec![
            job("a", true, true, true),
            job("b", false, true, false),
            job("c", false, false, true),
            job("d", true, false, false),
            job("e", false, true, true),
        ]
    }

    fn ids(store: &JobStore) -> Vec<String> {
        store.visible_jobs().map(|j| j.id.clone()).collect()
    }

    #[test]
    fn test_default_shows_everything_in_order() {
        let store = JobStore::new(sample(), FilterState::default());
        assert_eq!(ids(&store), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(store.total(), 5);
    }

    #[test]
    fn test_individual_filters() {
        let mut store = JobStore::new(sample(), FilterState::default());
        store.toggle(FilterKind::ExcludeUsOnly);
        assert_eq!(ids(&store), vec!["b", "c", "e"]);

        store.toggle(FilterKind::ExcludeUsOnly);
        store.toggle(FilterKind::RemoteOnly);
        assert_eq!(ids(&store), vec!["a", "b", "e"]);

        store.toggle(FilterKind::RemoteOnly);
        store.toggle(FilterKind::VisaOnly);
        assert_eq!(ids(&store), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_all_filters_intersect_and_reset_restores() {
        let kinds = [FilterKind::ExcludeUsOnly, FilterKind::RemoteOnly, FilterKind::VisaOnly];
        let singles: Vec<Vec<String>> = kinds
            .iter()
            .map(|&kind| {
                let mut filters = FilterState::default();
                filters.toggle(kind);
                ids(&JobStore::new(sample(), filters))
            })
            .collect();

        let mut store = JobStore::new(sample(), FilterState::default());
        for kind in kinds {
            store.toggle(kind);
        }
        let all = ids(&store);
        let expected: Vec<String> = singles[0]
            .iter()
            .filter(|id| singles[1].contains(id) && singles[2].contains(id))
            .cloned()
            .collect();
        assert_eq!(all, expected);
        assert_eq!(all, vec!["e"]);

        for kind in kinds {
            store.toggle(kind);
        }
        assert_eq!(store.filters(), FilterState::default());
        assert_eq!(ids(&store), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_underlying_jobs_untouched() {
        let original = sample();
        let mut store = JobStore::new(original.clone(), FilterState::default());
        store.toggle(FilterKind::VisaOnly);
        store.toggle(FilterKind::VisaOnly);
        assert_eq!(store.visible_jobs().cloned().collect::<Vec<_>>(), original);
    }

    #[test]
    fn test_empty_store() {
        let store = JobStore::new(Vec::new(), FilterState { remote_only: true, ..Default::default() });
        assert_eq!(store.visible_len(), 0);
        assert!(store.visible(0).is_none());
        assert!(store.filters().remote_only);
    }
}
