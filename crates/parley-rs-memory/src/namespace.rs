//! Namespace keys for long-term memory records.

/// Namespace holding preference records for an actor.
pub fn preference_namespace(strategy_id: &str, actor_id: &str) -> String {
    format!("/strategies/{strategy_id}/actors/{actor_id}")
}

/// Namespace holding per-session records (summaries) for an actor.
pub fn session_namespace(strategy_id: &str, actor_id: &str, session_id: &str) -> String {
    format!(
        "{}/sessions/{session_id}",
        preference_namespace(strategy_id, actor_id)
    )
}

/// Split a namespace into its non-empty path segments.
pub(crate) fn segments(namespace: &str) -> Vec<&str> {
    namespace
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{preference_namespace, segments, session_namespace};
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_preference_and_session_namespaces() {
        assert_eq!(
            preference_namespace("prefs_abc", "alice"),
            "/strategies/prefs_abc/actors/alice"
        );
        assert_eq!(
            session_namespace("summary_abc", "alice", "s1"),
            "/strategies/summary_abc/actors/alice/sessions/s1"
        );
    }

    #[test]
    fn segments_skip_empty_parts() {
        assert_eq!(
            segments("/strategies/x//actors/y/"),
            vec!["strategies", "x", "actors", "y"]
        );
    }
}
