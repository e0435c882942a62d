use std::time::Duration;

use eframe::egui::{Context, Vec2};

use crate::dataset::Node;
use crate::search::node_matches;

use super::graph::{MAX_ZOOM, MIN_ZOOM};
use super::ViewModel;

const RETRY_ATTEMPTS: u32 = 20;
const RETRY_INTERVAL_SECS: f64 = 0.1;
const ANIMATION_SECS: f64 = 0.55;
const FOCUS_ZOOM: f32 = 1.6;

const TITLE_EXACT: u32 = 100;
const TITLE_CONTAINS: u32 = 50;
const TITLE_PREFIX: u32 = 30;
const TAG_EXACT: u32 = 40;
const TAG_CONTAINS: u32 = 20;
const ENTITY_EXACT: u32 = 40;
const ENTITY_CONTAINS: u32 = 20;

/// Auto-focus bookkeeping: at most one pending target and one running
/// animation. Both die with the ViewModel, so a dataset swap can never mutate
/// disposed state.
#[derive(Default)]
pub(in crate::app) struct CameraFocus {
    pending: Option<PendingFocus>,
    animation: Option<CameraAnimation>,
}

struct PendingFocus {
    node_id: String,
    attempts_left: u32,
    next_attempt_at: f64,
}

struct CameraAnimation {
    from_pan: Vec2,
    from_zoom: f32,
    to_pan: Vec2,
    to_zoom: f32,
    started_at: f64,
}

impl CameraFocus {
    fn request(&mut self, node_id: String, now: f64) {
        self.pending = Some(PendingFocus {
            node_id,
            attempts_left: RETRY_ATTEMPTS,
            next_attempt_at: now,
        });
    }

    fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

/// Focus-target score, separate from the sidebar matcher: weighted toward
/// title hits, with tags and entities as secondary signals.
pub(in crate::app) fn score_focus_target(query: &str, node: &Node) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let mut score = 0;

    let title = node.title.to_lowercase();
    if title == query {
        score += TITLE_EXACT;
    }
    if title.contains(&query) {
        score += TITLE_CONTAINS;
    }
    if title.starts_with(&query) {
        score += TITLE_PREFIX;
    }

    for tag in node.all_tags() {
        let tag = tag.to_lowercase();
        if tag == query {
            score += TAG_EXACT;
        } else if tag.contains(&query) {
            score += TAG_CONTAINS;
        }
    }

    for entity in &node.entities {
        let entity = entity.to_lowercase();
        if entity == query {
            score += ENTITY_EXACT;
        } else if entity.contains(&query) {
            score += ENTITY_CONTAINS;
        }
    }

    score
}

/// Best camera target for a query: the highest-scoring node among those that
/// pass the strict relevance filter, ties broken by dataset order.
pub(in crate::app) fn pick_focus_target<'a>(query: &str, nodes: &'a [Node]) -> Option<&'a Node> {
    if query.trim().is_empty() {
        return None;
    }

    let mut best: Option<(u32, &Node)> = None;
    for node in nodes {
        if !node_matches(query, node) {
            continue;
        }
        let score = score_focus_target(query, node);
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, node));
        }
    }

    best.map(|(_score, node)| node)
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - (u * u * u) * 0.5
    }
}

impl ViewModel {
    /// Called on every query edit. Re-aims the camera when auto-focus is on;
    /// always drops any previous pending target first.
    pub(in crate::app) fn on_query_changed(&mut self, now: f64) {
        self.camera.cancel_pending();
        if !self.filters.auto_focus {
            return;
        }

        if let Some(target) = pick_focus_target(&self.filters.query, &self.dataset.nodes) {
            self.camera.request(target.id.clone(), now);
        }
    }

    /// Per-frame camera work: poll the pending focus (bounded, time-deferred
    /// retries) and advance the pan/zoom animation.
    pub(in crate::app) fn advance_camera(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);

        if let Some(mut pending) = self.camera.pending.take() {
            if now < pending.next_attempt_at {
                ctx.request_repaint_after(Duration::from_secs_f64(
                    (pending.next_attempt_at - now).max(0.0),
                ));
                self.camera.pending = Some(pending);
            } else {
                let placed = self.graph_cache.as_ref().and_then(|cache| {
                    let &index = cache.index_by_id.get(&pending.node_id)?;
                    let position = cache.nodes.get(index)?.world_pos;
                    (cache.ticks > 0 && position.x.is_finite() && position.y.is_finite())
                        .then_some(position)
                });

                match placed {
                    Some(position) => {
                        let to_zoom = FOCUS_ZOOM.clamp(MIN_ZOOM, MAX_ZOOM);
                        self.camera.animation = Some(CameraAnimation {
                            from_pan: self.pan,
                            from_zoom: self.zoom,
                            to_pan: -position * to_zoom,
                            to_zoom,
                            started_at: now,
                        });
                        ctx.request_repaint();
                    }
                    None if pending.attempts_left <= 1 => {
                        // Non-critical: a missed auto-focus only costs the
                        // user a manual pan.
                        tracing::debug!(
                            node_id = %pending.node_id,
                            "camera focus target never received a position"
                        );
                    }
                    None => {
                        pending.attempts_left -= 1;
                        pending.next_attempt_at = now + RETRY_INTERVAL_SECS;
                        ctx.request_repaint_after(Duration::from_secs_f64(RETRY_INTERVAL_SECS));
                        self.camera.pending = Some(pending);
                    }
                }
            }
        }

        if let Some(animation) = &self.camera.animation {
            let t = ((now - animation.started_at) / ANIMATION_SECS).clamp(0.0, 1.0) as f32;
            let eased = ease_in_out(t);
            self.pan = animation.from_pan + (animation.to_pan - animation.from_pan) * eased;
            self.zoom = animation.from_zoom + (animation.to_zoom - animation.from_zoom) * eased;
            if t >= 1.0 {
                self.camera.animation = None;
            } else {
                ctx.request_repaint();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Tags;

    fn node(id: &str, title: &str, tags: &[&str], entities: &[&str]) -> Node {
        Node {
            id: id.to_owned(),
            title: title.to_owned(),
            tags: Tags {
                high_level: tags.iter().map(|tag| (*tag).to_owned()).collect(),
                low_level: Vec::new(),
            },
            entities: entities.iter().map(|entity| (*entity).to_owned()).collect(),
            ..Node::default()
        }
    }

    #[test]
    fn exact_title_outranks_containing_title() {
        let exact = node("a", "Budget", &[], &[]);
        let containing = node("b", "Budget Review 2025", &[], &[]);
        assert!(
            score_focus_target("budget", &exact) > score_focus_target("budget", &containing)
        );
    }

    #[test]
    fn tag_and_entity_hits_contribute() {
        let tagged = node("a", "Untitled", &["finance"], &[]);
        assert_eq!(score_focus_target("finance", &tagged), TAG_EXACT);

        let entity = node("b", "Untitled", &[], &["Finance Team"]);
        assert_eq!(score_focus_target("finance", &entity), ENTITY_CONTAINS);
    }

    #[test]
    fn pick_requires_passing_the_strict_filter() {
        let nodes = vec![node("a", "Chemistry Lab", &[], &[])];
        assert!(pick_focus_target("budget", &nodes).is_none());
        assert!(pick_focus_target("", &nodes).is_none());
    }

    #[test]
    fn pick_breaks_ties_by_dataset_order() {
        let nodes = vec![
            node("first", "Budget Review", &[], &[]),
            node("second", "Budget Review", &[], &[]),
        ];
        assert_eq!(pick_focus_target("budget", &nodes).unwrap().id, "first");
    }

    #[test]
    fn pick_prefers_higher_scores_over_order() {
        let nodes = vec![
            node("weak", "Notes mentioning budget things", &[], &[]),
            node("strong", "Budget", &[], &[]),
        ];
        assert_eq!(pick_focus_target("budget", &nodes).unwrap().id, "strong");
    }

    #[test]
    fn easing_is_monotone_with_fixed_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        let mut last = 0.0;
        for step in 1..=10 {
            let value = ease_in_out(step as f32 / 10.0);
            assert!(value >= last);
            last = value;
        }
    }
}
