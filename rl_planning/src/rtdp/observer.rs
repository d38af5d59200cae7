/// What happened during one RTDP trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize, // zero-based
    pub steps: usize,
    pub total_reward: f32, // undiscounted
    pub epsilon: f32,
}

/// Receives a summary after every RTDP episode.
/// Observers only watch: nothing they do feeds back into planning.
pub trait EpisodeObserver {
    fn on_episode(&mut self, summary: &EpisodeSummary);
}

impl<F: FnMut(&EpisodeSummary)> EpisodeObserver for F {
    fn on_episode(&mut self, summary: &EpisodeSummary) {
        self(summary);
    }
}

impl EpisodeObserver for () {
    fn on_episode(&mut self, _summary: &EpisodeSummary) {}
}

/// Reports every episode through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl EpisodeObserver for LogObserver {
    fn on_episode(&mut self, summary: &EpisodeSummary) {
        log::info!(
            "Episode {}: steps={}, total_reward={:.2}",
            summary.episode + 1,
            summary.steps,
            summary.total_reward
        );
    }
}
