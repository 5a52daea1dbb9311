//! Per-session orchestration of the streaming pipeline.
//!
//! One `SessionEngine` owns every piece of mutable per-session state —
//! scene, gate, animator, baseline, debounce bookkeeping — explicitly, so
//! nothing leaks across sessions and each piece is testable in isolation.
//! Handlers are transitions of a small lifecycle state machine; they mutate
//! the session and return the side effects they want as [`Effect`] values.
//! A dispatcher applies those onto the collaborator traits.
//!
//! Everything runs on one logical thread. Handlers may interleave at
//! event-loop granularity but never concurrently, so there is no locking;
//! correctness comes from each handler being self-contained and idempotent
//! for repeated inputs.

use crate::config::EngineConfig;
use crate::diff::EditDiffTracker;
use crate::elements::{element::min_bounds, DrawElement, ViewportCommand};
use crate::error::absorb;
use crate::render::{DrawingBackend, RenderGate, TreePatcher, VisualReconciler};
use crate::session::persist::{deserialize_elements, serialize_elements, PostedDrawing};
use crate::session::{DebouncedWrite, SceneSession, SessionStore};
use crate::stream::{classify, trim_unconfirmed};
use crate::viewport::ViewportAnimator;

use super::events::{DisplayMode, Effect, HostLink, InputPayload, OutboundMessage};

/// Session lifecycle. Teardown is terminal: a torn-down engine ignores every
/// later event, including delayed debounce fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Streaming,
    FinalDisplayed,
    Editing,
    TornDown,
}

pub struct SessionEngine {
    session_id: String,
    config: EngineConfig,
    phase: Phase,
    alive: bool,
    mode: DisplayMode,
    fullscreen_requested: bool,

    scene: SceneSession,
    gate: RenderGate,
    animator: ViewportAnimator,
    diff: EditDiffTracker,

    persist_pending: DebouncedWrite,
    notify_pending: DebouncedWrite,

    /// Latest elements reported by the interactive editor, when it has taken
    /// over from the streamed scene.
    edited: Option<Vec<DrawElement>>,
    /// Exactly what the last repaint put on screen, including in-flight
    /// partial content the session has not committed yet. Animation frames
    /// repaint this, so a camera move never erases a mid-stream batch.
    last_painted: Vec<DrawElement>,
    pending_screenshot: Option<String>,
    pending_prompt: Option<String>,
}

impl SessionEngine {
    pub fn new(session_id: impl Into<String>, config: EngineConfig) -> Self {
        SessionEngine {
            session_id: session_id.into(),
            config,
            phase: Phase::Idle,
            alive: true,
            mode: DisplayMode::Inline,
            fullscreen_requested: false,
            scene: SceneSession::new(),
            gate: RenderGate::new(),
            animator: ViewportAnimator::new(),
            diff: EditDiffTracker::new(),
            persist_pending: DebouncedWrite::default(),
            notify_pending: DebouncedWrite::default(),
            edited: None,
            last_painted: Vec::new(),
            pending_screenshot: None,
            pending_prompt: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scene(&self) -> &SceneSession {
        &self.scene
    }

    pub fn animator(&self) -> &ViewportAnimator {
        &self.animator
    }

    /// Source of truth for persistence and diffing: the editor's latest
    /// state once it has reported edits, the streamed scene before that.
    fn current_elements(&self) -> Vec<DrawElement> {
        match &self.edited {
            Some(elements) => elements.clone(),
            None => self.scene.elements(),
        }
    }

    fn apply_viewport(&mut self, viewport: Option<ViewportCommand>, effects: &mut Vec<Effect>) {
        if let Some(vp) = viewport {
            self.animator.set_target(vp);
            if self.animator.is_animating() {
                effects.push(Effect::ScheduleFrame);
            }
        }
    }

    fn request_fullscreen_once(&mut self, effects: &mut Vec<Effect>) {
        if self.mode == DisplayMode::Inline && !self.fullscreen_requested {
            self.fullscreen_requested = true;
            effects.push(Effect::RequestDisplayMode(DisplayMode::Fullscreen));
        }
    }

    fn display_frame(&self, elements: &[DrawElement]) -> ViewportCommand {
        self.animator.frame(min_bounds(elements), self.config.frame_padding)
    }

    /// A partial delivery of the current drawing pass. Decodes whatever is
    /// structurally complete, drops the unconfirmed tail, and re-renders
    /// only when the gate says the visible scene actually changed.
    pub fn on_partial_input(&mut self, payload: &InputPayload) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        self.phase = Phase::Streaming;

        let mut effects = Vec::new();
        self.request_fullscreen_once(&mut effects);

        let batch = classify(&payload.records());
        self.apply_viewport(batch.viewport, &mut effects);

        let mut drawables = trim_unconfirmed(batch.drawables);
        if drawables.is_empty() {
            return effects;
        }

        let decision = self.gate.evaluate_partial(&mut drawables);
        if !decision.render {
            return effects;
        }
        for kind in decision.appeared {
            effects.push(Effect::PlayCue { kind });
        }

        let background = self.scene.background_excluding(&drawables);
        let mut visible = background.clone();
        visible.extend_from_slice(&drawables);
        let view = self.display_frame(&visible);
        self.last_painted = visible;
        effects.push(Effect::Repaint { background, foreground: drawables, view });
        effects
    }

    /// The final delivery of a drawing pass: merge into the session, render
    /// with the decoded seeds as given, capture the edit baseline, and
    /// schedule a persistence write.
    pub fn on_final_input(&mut self, payload: &InputPayload, now: f64) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }

        let mut effects = Vec::new();
        self.request_fullscreen_once(&mut effects);

        let batch = classify(&payload.records());
        self.apply_viewport(batch.viewport, &mut effects);
        self.gate.note_final();

        let background = self.scene.background_excluding(&batch.drawables);
        let all = self.scene.upsert(&batch.drawables);
        self.edited = None;
        self.diff.capture_baseline(&all);
        self.persist_pending.mark_dirty(now);

        let view = self.display_frame(&all);
        self.last_painted = all;
        effects.push(Effect::Repaint { background, foreground: batch.drawables, view });

        self.phase = Phase::FinalDisplayed;
        self.fullscreen_requested = false;
        effects
    }

    /// The interactive editor reported a changed scene. Nothing happens
    /// immediately — persistence and the diff notification both wait out
    /// their quiescence windows so rapid edits coalesce.
    pub fn on_user_edit(&mut self, elements: Vec<DrawElement>, now: f64) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        self.phase = Phase::Editing;
        if !self.diff.has_baseline() {
            self.diff.capture_baseline(&self.scene.elements());
        }
        self.edited = Some(elements);
        self.persist_pending.mark_dirty(now);
        self.notify_pending.mark_dirty(now);
        Vec::new()
    }

    /// A drawing posted from the editor page: screenshot and prompt ride
    /// along with the next notification; the element list counts as an edit.
    pub fn on_posted_drawing(&mut self, posted: PostedDrawing, now: f64) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        if posted.screenshot.is_some() {
            self.pending_screenshot = posted.screenshot;
        }
        if posted.prompt.is_some() {
            self.pending_prompt = posted.prompt;
        }
        match posted.elements.as_deref() {
            Some(json) => {
                let effects = self.on_user_edit(deserialize_elements(json), now);
                // Even an empty diff should deliver a prompt promptly.
                self.notify_pending.mark_dirty(now);
                effects
            }
            None => {
                self.notify_pending.mark_dirty(now);
                Vec::new()
            }
        }
    }

    /// Display mode changed (e.g., the editor took over fullscreen).
    /// `persisted` is the stored scene for this session, read once at entry;
    /// it only seeds an empty session so a stale resume never clobbers
    /// in-flight work.
    pub fn on_display_mode_changed(&mut self, mode: DisplayMode, persisted: Option<String>) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        self.mode = mode;
        if mode == DisplayMode::Fullscreen {
            self.fullscreen_requested = false;
        }
        if let Some(json) = persisted {
            self.scene.load_from(deserialize_elements(&json));
            if !self.diff.has_baseline() {
                self.diff.capture_baseline(&self.scene.elements());
            }
        }
        Vec::new()
    }

    /// Explicit user "clear canvas": empty the session, reset the baseline,
    /// drop the persisted copy, and paint the empty scene.
    pub fn on_clear_canvas(&mut self) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        self.scene.clear();
        self.edited = None;
        self.last_painted.clear();
        self.diff.capture_baseline(&[]);
        self.persist_pending.cancel();

        let view = self.display_frame(&[]);
        vec![
            Effect::ClearPersisted { key: self.session_id.clone() },
            Effect::Repaint { background: Vec::new(), foreground: Vec::new(), view },
        ]
    }

    /// Debounce clock. Call regularly with the current time; fires pending
    /// persistence writes and edit notifications once their windows lapse.
    pub fn tick(&mut self, now: f64) -> Vec<Effect> {
        if !self.alive {
            return Vec::new();
        }
        let mut effects = Vec::new();

        if self.persist_pending.tick(now, self.config.persist_debounce_secs) {
            let elements = self.current_elements();
            if let Some(json) = absorb(serialize_elements(&elements), "session serialize") {
                effects.push(Effect::Persist { key: self.session_id.clone(), elements_json: json });
            }
        }

        if self.notify_pending.tick(now, self.config.notify_debounce_secs) {
            let elements = self.current_elements();
            let diff = self.diff.diff(&elements);
            let prompt = self.pending_prompt.take();
            if !diff.is_empty() || prompt.is_some() {
                let text = match prompt {
                    Some(p) if diff.is_empty() => p,
                    Some(p) => format!("{p}\n{diff}"),
                    None => diff,
                };
                let screenshot = self.pending_screenshot.take();
                effects.push(Effect::SendMessage(OutboundMessage::edit_notification(text, screenshot)));
                // Subsequent notifications describe edits since this one.
                self.diff.capture_baseline(&elements);
            }
        }

        effects
    }

    /// One display-refresh callback for the viewport animation. Repaints
    /// what is already on screen at the interpolated window and keeps
    /// requesting frames until settled.
    pub fn step_frame(&mut self) -> Vec<Effect> {
        if !self.alive || !self.animator.is_animating() {
            return Vec::new();
        }
        let more = self.animator.step();
        let elements = self.last_painted.clone();
        let view = self.display_frame(&elements);
        let mut effects = vec![Effect::Repaint { background: Vec::new(), foreground: elements, view }];
        if more {
            effects.push(Effect::ScheduleFrame);
        }
        effects
    }

    /// End of session. Cancels pending debounces and the viewport animation;
    /// any event or delayed fire arriving afterwards is a no-op.
    pub fn teardown(&mut self) {
        self.alive = false;
        self.phase = Phase::TornDown;
        self.persist_pending.cancel();
        self.notify_pending.cancel();
        self.animator.cancel();
    }
}

/// Apply a handler's effects onto the collaborators. Host and store
/// failures are absorbed here — the policy layer, not the handlers, decides
/// that they are non-fatal.
pub fn dispatch_effects<B, P, H, S>(
    effects: Vec<Effect>,
    reconciler: &mut VisualReconciler<B, P>,
    host: &mut H,
    store: &mut S,
) where
    B: DrawingBackend,
    P: TreePatcher,
    H: HostLink,
    S: SessionStore,
{
    for effect in effects {
        match effect {
            Effect::Repaint { background, foreground, view } => {
                reconciler.repaint(background, &foreground, &view);
            }
            Effect::PlayCue { kind } => host.play_cue(&kind),
            Effect::ScheduleFrame => host.schedule_frame(),
            Effect::Persist { key, elements_json } => {
                absorb(store.put(&key, &elements_json), "session write");
            }
            Effect::ClearPersisted { key } => {
                absorb(store.delete(&key), "session clear");
            }
            Effect::SendMessage(message) => {
                absorb(host.send_message(&message), "host message");
            }
            Effect::RequestDisplayMode(mode) => {
                absorb(host.request_display_mode(mode), "display mode request");
            }
        }
    }
}
