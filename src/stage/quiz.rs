//! Quiz screen
//!
//! One cycle runs board slide-in (credit panel sliding alongside), a typed
//! intro message, the "next" control, then the question with its options.
//! The first answer locks the question and triggers a mascot reaction.
//! Back-navigation slides everything out; once past the threshold the quiz
//! tears its visuals down and reports finished.
//!
//! Every text mesh needs the font. Until it arrives the quiz keeps running
//! and text nodes are created on the first tick after it resolves.

use glam::{Vec2, Vec3};

use super::participant::{Participant, ParticipantKey, Reaction, Stage, StageEvent};
use super::question::QuestionSource;
use crate::assets::{FontAsset, Pending};
use crate::hex_color;
use crate::move_toward;
use crate::scene::{Node, NodeId, PanelGlyph, PanelStyle, Ray, Shape};
use crate::tuning::QuizTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Not on screen
    Inactive,
    /// Board easing down into place
    BoardSliding,
    /// Intro message being revealed
    Typing,
    /// Intro done, next control visible
    AwaitingNext,
    /// Question and options on screen, no answer yet
    Answering,
    /// First answer taken; later clicks on options are ignored
    Locked { choice: usize, correct: bool },
    /// Back-navigation slide-out
    Exiting,
}

/// Observable progress, for comparing cycles
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub typed: usize,
    pub board_y: Option<f32>,
    pub credit_y: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Back,
    Next,
    CreditLink,
    Option(usize),
}

struct OptionButton {
    node: NodeId,
    label: Option<NodeId>,
    text: String,
}

/// Nodes built on `enter_scene`, all under one container
struct Layout {
    container: NodeId,
    back: NodeId,
    board: NodeId,
    next: NodeId,
    credit: NodeId,
    credit_target_y: f32,
    board_text: Option<(NodeId, String)>,
    next_label: Option<NodeId>,
    credit_prefix: Option<NodeId>,
    credit_link: Option<NodeId>,
    options: Vec<OptionButton>,
}

pub struct Quiz {
    tuning: QuizTuning,
    font: Pending<FontAsset>,
    source: Box<dyn QuestionSource>,
    phase: QuizPhase,
    layout: Option<Layout>,
    credit_sliding: bool,
    typed: usize,
    typing_timer_ms: f32,
    /// What the board should currently say
    board_message: String,
    finished: bool,
}

fn panel(size: Vec2, color: u32, corner_radius: f32, glyph: Option<PanelGlyph>) -> Node {
    let fill = hex_color(color);
    Node::new(Shape::Panel {
        size,
        style: PanelStyle {
            corner_radius,
            fill,
            glyph,
        },
    })
    .with_color(fill)
}

fn text(font: &FontAsset, content: &str, size: f32, color: u32) -> Node {
    Node::new(Shape::Text {
        content: content.to_string(),
        size,
        extent: font.measure(content, size),
    })
    .with_color(hex_color(color))
    .with_render_order(2)
}

fn recolor(node: &mut Node, color: [f32; 4]) {
    node.color = color;
    if let Shape::Panel { style, .. } = &mut node.shape {
        style.fill = color;
    }
}

/// Text sits just in front of its panel
const TEXT_LIFT: f32 = 0.01;

impl Quiz {
    pub fn new(
        tuning: QuizTuning,
        font: Pending<FontAsset>,
        source: Box<dyn QuestionSource>,
    ) -> Self {
        Self {
            tuning,
            font,
            source,
            phase: QuizPhase::Inactive,
            layout: None,
            credit_sliding: false,
            typed: 0,
            typing_timer_ms: 0.0,
            board_message: String::new(),
            finished: false,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn back_button(&self) -> Option<NodeId> {
        self.layout.as_ref().map(|l| l.back)
    }

    pub fn next_button(&self) -> Option<NodeId> {
        self.layout.as_ref().map(|l| l.next)
    }

    pub fn board(&self) -> Option<NodeId> {
        self.layout.as_ref().map(|l| l.board)
    }

    pub fn credit_link(&self) -> Option<NodeId> {
        self.layout.as_ref().and_then(|l| l.credit_link)
    }

    pub fn option(&self, index: usize) -> Option<NodeId> {
        self.layout
            .as_ref()
            .and_then(|l| l.options.get(index))
            .map(|o| o.node)
    }

    pub fn option_count(&self) -> usize {
        self.layout.as_ref().map_or(0, |l| l.options.len())
    }

    /// Content of the text mesh currently on the board
    pub fn board_text(&self) -> Option<&str> {
        self.layout
            .as_ref()
            .and_then(|l| l.board_text.as_ref())
            .map(|(_, s)| s.as_str())
    }

    pub fn snapshot(&self, stage: &Stage<'_>) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            typed: self.typed,
            board_y: self.board().and_then(|b| stage.scene.y(b)),
            credit_y: self
                .layout
                .as_ref()
                .and_then(|l| stage.scene.y(l.credit)),
        }
    }

    fn build_layout(&self, stage: &mut Stage<'_>) -> Option<Layout> {
        let t = &self.tuning;
        let view = stage.camera.view_size(stage.camera.position.z - t.depth);
        let (half_w, half_h) = (view.x / 2.0, view.y / 2.0);

        let container = stage
            .scene
            .add(Node::new(Shape::Group).with_position(Vec3::new(0.0, 0.0, t.depth)));

        let close = t.close_size;
        let back = stage.scene.add_child(
            container,
            panel(Vec2::splat(close), t.close_color, t.panel_radius, Some(PanelGlyph::Cross))
                .with_position(Vec3::new(
                    half_w - close / 2.0 - t.padding,
                    half_h - close / 2.0 - t.padding,
                    0.0,
                ))
                .with_render_order(1),
        )?;

        let board = stage.scene.add_child(
            container,
            panel(
                Vec2::from_array(t.board_size),
                t.panel_color,
                t.panel_radius,
                None,
            )
            .with_position(Vec3::new(0.0, t.board_start_y, 0.0)),
        )?;

        let next = stage.scene.add_child(
            container,
            panel(Vec2::from_array(t.next_size), t.next_color, t.panel_radius, None)
                .with_position(Vec3::new(0.0, -half_h + t.next_bottom_offset, 0.0))
                .with_render_order(1)
                .with_visible(false),
        )?;

        let credit = stage.scene.add_child(
            container,
            panel(
                Vec2::from_array(t.credit_size),
                t.panel_color,
                t.panel_radius,
                None,
            )
            .with_position(Vec3::new(0.0, -half_h - t.credit_offscreen, 0.0)),
        )?;

        Some(Layout {
            container,
            back,
            board,
            next,
            credit,
            credit_target_y: -half_h + t.credit_margin,
            board_text: None,
            next_label: None,
            credit_prefix: None,
            credit_link: None,
            options: Vec::new(),
        })
    }

    /// Create whichever text meshes are missing or stale
    fn ensure_labels(&mut self, stage: &mut Stage<'_>) {
        let Some(font) = self.font.get() else {
            return;
        };
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        let t = &self.tuning;
        let lift = Vec3::new(0.0, 0.0, TEXT_LIFT);

        let stale = layout
            .board_text
            .as_ref()
            .is_none_or(|(_, shown)| *shown != self.board_message);
        if stale {
            if let Some((old, _)) = layout.board_text.take() {
                stage.scene.remove(old);
            }
            if !self.board_message.is_empty() {
                let node = text(&font, &self.board_message, t.text_size, t.text_color)
                    .with_position(lift);
                layout.board_text = stage
                    .scene
                    .add_child(layout.board, node)
                    .map(|id| (id, self.board_message.clone()));
            }
        }

        if layout.next_label.is_none() {
            let node = text(&font, &t.next_label, t.text_size, 0xffffff).with_position(lift);
            layout.next_label = stage.scene.add_child(layout.next, node);
        }

        if layout.credit_prefix.is_none() {
            let size = t.credit_text_size;
            let gap = size;
            let prefix_w = font.measure(&t.credit_prefix, size).x;
            let author_w = font.measure(&t.credit_author, size).x;
            let total = prefix_w + gap + author_w;

            let prefix = text(&font, &t.credit_prefix, size, t.text_color)
                .with_position(Vec3::new(-total / 2.0 + prefix_w / 2.0, 0.0, TEXT_LIFT));
            let author = text(&font, &t.credit_author, size, t.link_color)
                .with_position(Vec3::new(total / 2.0 - author_w / 2.0, 0.0, TEXT_LIFT));
            layout.credit_prefix = stage.scene.add_child(layout.credit, prefix);
            layout.credit_link = stage.scene.add_child(layout.credit, author);
        }

        for option in layout.options.iter_mut().filter(|o| o.label.is_none()) {
            let node = text(&font, &option.text, t.text_size, 0xffffff).with_position(lift);
            option.label = stage.scene.add_child(option.node, node);
        }
    }

    fn slide_credit(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let Some(y) = stage.scene.y(layout.credit) else {
            return;
        };
        let y = move_toward(y, layout.credit_target_y, self.tuning.slide_speed * dt);
        stage.scene.set_y(layout.credit, y);
        if y == layout.credit_target_y {
            self.credit_sliding = false;
        }
    }

    fn slide_board(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let Some(board) = self.board() else {
            return;
        };
        let Some(y) = stage.scene.y(board) else {
            return;
        };
        let target = self.tuning.board_target_y;
        let y = move_toward(y, target, self.tuning.slide_speed * dt);
        stage.scene.set_y(board, y);
        if y == target {
            self.start_typing(stage);
        }
    }

    fn start_typing(&mut self, stage: &mut Stage<'_>) {
        self.phase = QuizPhase::Typing;
        self.typed = 0;
        self.typing_timer_ms = 0.0;
        self.board_message.clear();
        if self.tuning.intro_message.is_empty() {
            self.reveal_next(stage);
        }
    }

    /// At most one character per tick, once the interval has elapsed
    fn type_step(&mut self, stage: &mut Stage<'_>, dt: f32) {
        self.typing_timer_ms += dt * 1000.0;
        if self.typing_timer_ms < self.tuning.typing_interval_ms {
            return;
        }
        self.typing_timer_ms = 0.0;
        self.typed += 1;
        self.board_message = self.tuning.intro_message.chars().take(self.typed).collect();
        self.ensure_labels(stage);

        if self.typed >= self.tuning.intro_message.chars().count() {
            self.reveal_next(stage);
        }
    }

    fn reveal_next(&mut self, stage: &mut Stage<'_>) {
        self.phase = QuizPhase::AwaitingNext;
        self.set_next_visible(stage, true);
    }

    fn set_next_visible(&self, stage: &mut Stage<'_>, visible: bool) {
        if let Some(next) = self.next_button() {
            stage.scene.set_visible(next, visible);
        }
    }

    fn show_question(&mut self, stage: &mut Stage<'_>) {
        self.set_next_visible(stage, false);
        let Some(layout) = self.layout.as_mut() else {
            return;
        };
        for option in layout.options.drain(..) {
            stage.scene.remove(option.node);
        }

        let Some(question) = self.source.current().cloned() else {
            log::warn!("Question source is empty");
            return;
        };
        let t = &self.tuning;
        for (i, label) in question.options.iter().enumerate() {
            let y = t.board_target_y - t.option_offset - i as f32 * t.option_spacing;
            let node = panel(
                Vec2::from_array(t.option_size),
                t.option_color,
                t.panel_radius,
                None,
            )
            .with_position(Vec3::new(0.0, y, 0.0))
            .with_render_order(1);
            if let Some(node) = stage.scene.add_child(layout.container, node) {
                layout.options.push(OptionButton {
                    node,
                    label: None,
                    text: label.clone(),
                });
            }
        }

        self.board_message = question.prompt;
        self.phase = QuizPhase::Answering;
        self.ensure_labels(stage);
        log::debug!("Question shown with {} options", self.option_count());
    }

    fn on_next(&mut self, stage: &mut Stage<'_>) {
        match self.phase {
            QuizPhase::AwaitingNext => self.show_question(stage),
            QuizPhase::Locked { .. } => {
                if self.source.advance() {
                    self.show_question(stage);
                }
            }
            _ => {}
        }
    }

    /// Lock in an answer. Only the first selection counts.
    fn select(&mut self, stage: &mut Stage<'_>, index: usize) {
        if self.phase != QuizPhase::Answering {
            return;
        }
        let Some(question) = self.source.current() else {
            return;
        };
        let correct = question.is_correct(index);
        let color = if correct {
            self.tuning.correct_color
        } else {
            self.tuning.incorrect_color
        };
        if let Some(node) = self.option(index).and_then(|id| stage.scene.get_mut(id)) {
            recolor(node, hex_color(color));
        }

        self.phase = QuizPhase::Locked {
            choice: index,
            correct,
        };
        log::info!("Answer {} locked ({})", index + 1, if correct { "correct" } else { "incorrect" });
        stage.emit(StageEvent::MascotReact(if correct {
            Reaction::Correct
        } else {
            Reaction::Incorrect
        }));

        if !self.source.is_exhausted() {
            self.set_next_visible(stage, true);
        }
    }

    fn begin_exit(&mut self, stage: &mut Stage<'_>) {
        if matches!(self.phase, QuizPhase::Inactive | QuizPhase::Exiting) {
            return;
        }
        log::info!("Leaving quiz");
        self.phase = QuizPhase::Exiting;
        self.credit_sliding = false;
        stage.emit(StageEvent::MascotExit);
    }

    /// Board goes up, everything else goes down
    fn slide_out(&mut self, stage: &mut Stage<'_>, dt: f32) {
        let Some(layout) = self.layout.as_ref() else {
            self.finish(stage);
            return;
        };
        let step = self.tuning.exit_speed * dt;
        let board_y = stage.scene.y(layout.board).unwrap_or(f32::INFINITY) + step;
        stage.scene.set_y(layout.board, board_y);

        let sinking = [layout.next, layout.credit]
            .into_iter()
            .chain(layout.options.iter().map(|o| o.node));
        for id in sinking {
            if let Some(y) = stage.scene.y(id) {
                stage.scene.set_y(id, y - step);
            }
        }

        if board_y >= self.tuning.board_start_y {
            self.finish(stage);
        }
    }

    fn finish(&mut self, stage: &mut Stage<'_>) {
        self.teardown(stage);
        self.finished = true;
        log::debug!("Quiz slide-out complete");
    }

    fn pick(&self, stage: &Stage<'_>, ray: &Ray) -> Option<Target> {
        let layout = self.layout.as_ref()?;
        if stage.scene.raycast(ray, &[layout.back], true).is_some() {
            return Some(Target::Back);
        }
        if stage.scene.raycast(ray, &[layout.next], true).is_some() {
            return Some(Target::Next);
        }
        if let Some(link) = layout.credit_link {
            if stage.scene.raycast(ray, &[link], true).is_some() {
                return Some(Target::CreditLink);
            }
        }
        let nodes: Vec<NodeId> = layout.options.iter().map(|o| o.node).collect();
        let hit = stage.scene.raycast(ray, &nodes, true)?;
        layout
            .options
            .iter()
            .position(|o| o.node == hit.target)
            .map(Target::Option)
    }
}

impl Participant for Quiz {
    fn key(&self) -> ParticipantKey {
        ParticipantKey::Quiz
    }

    fn advance(&mut self, stage: &mut Stage<'_>, dt: f32) {
        if self.phase == QuizPhase::Inactive {
            return;
        }
        self.ensure_labels(stage);

        if self.phase == QuizPhase::Exiting {
            self.slide_out(stage, dt);
            return;
        }
        if self.credit_sliding {
            self.slide_credit(stage, dt);
        }
        if self.phase == QuizPhase::BoardSliding {
            self.slide_board(stage, dt);
        }
        if self.phase == QuizPhase::Typing {
            self.type_step(stage, dt);
        }
    }

    fn enter_scene(&mut self, stage: &mut Stage<'_>) {
        self.teardown(stage);
        self.finished = false;
        self.source.rewind();
        self.typed = 0;
        self.typing_timer_ms = 0.0;
        self.board_message.clear();

        self.layout = self.build_layout(stage);
        if self.layout.is_none() {
            log::error!("Quiz layout could not be built");
            return;
        }
        self.phase = QuizPhase::BoardSliding;
        self.credit_sliding = true;
        self.ensure_labels(stage);
    }

    /// Leaving while still on screen counts as back-navigation; once the
    /// slide-out has finished there is nothing left to do
    fn exit_scene(&mut self, stage: &mut Stage<'_>) {
        self.begin_exit(stage);
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn handle_pointer(&mut self, stage: &mut Stage<'_>, ray: &Ray) {
        if matches!(self.phase, QuizPhase::Inactive | QuizPhase::Exiting) {
            return;
        }
        match self.pick(stage, ray) {
            Some(Target::Back) => self.begin_exit(stage),
            Some(Target::Next) => self.on_next(stage),
            Some(Target::CreditLink) => {
                stage.emit(StageEvent::OpenLink(self.tuning.credit_url.clone()))
            }
            Some(Target::Option(index)) => self.select(stage, index),
            None => {}
        }
    }

    fn teardown(&mut self, stage: &mut Stage<'_>) {
        if let Some(layout) = self.layout.take() {
            stage.scene.remove(layout.container);
        }
        self.phase = QuizPhase::Inactive;
        self.credit_sliding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::question::{Question, QuestionDeck};
    use crate::stage::testing::Harness;

    const DT: f32 = 1.0 / 60.0;

    fn quiz_with(font: Pending<FontAsset>, questions: Vec<Question>) -> Quiz {
        Quiz::new(
            QuizTuning::default(),
            font,
            Box::new(QuestionDeck::new(questions)),
        )
    }

    fn entered(h: &mut Harness) -> Quiz {
        let mut quiz = quiz_with(h.font(), vec![Question::sample()]);
        quiz.enter_scene(&mut h.stage());
        quiz
    }

    fn run_until(h: &mut Harness, quiz: &mut Quiz, phase: QuizPhase) {
        for _ in 0..2000 {
            if quiz.phase() == phase {
                return;
            }
            quiz.advance(&mut h.stage(), DT);
        }
        panic!("quiz never reached {:?}", phase);
    }

    fn ray_at(h: &Harness, node: NodeId) -> Ray {
        let p = h.scene.world_position(node).unwrap();
        Ray::new(Vec3::new(p.x, p.y, 3.0), Vec3::NEG_Z)
    }

    fn click(h: &mut Harness, quiz: &mut Quiz, node: NodeId) {
        let ray = ray_at(h, node);
        quiz.handle_pointer(&mut h.stage(), &ray);
    }

    fn color(h: &Harness, node: NodeId) -> [f32; 4] {
        h.scene.get(node).unwrap().color
    }

    #[test]
    fn test_intro_types_then_offers_next() {
        let mut h = Harness::new();
        let mut quiz = entered(&mut h);
        assert_eq!(quiz.phase(), QuizPhase::BoardSliding);
        assert!(!h.scene.is_visible(quiz.next_button().unwrap()));

        run_until(&mut h, &mut quiz, QuizPhase::Typing);
        assert_eq!(h.scene.y(quiz.board().unwrap()), Some(0.6));

        let mut last = 0;
        while quiz.phase() == QuizPhase::Typing {
            quiz.advance(&mut h.stage(), DT);
            let shown = quiz.board_text().map_or(0, |s| s.chars().count());
            assert!(shown == last || shown == last + 1);
            last = shown;
        }
        assert_eq!(quiz.phase(), QuizPhase::AwaitingNext);
        assert_eq!(quiz.board_text(), Some("Tekan berikutnya untuk memulai"));
        assert!(h.scene.is_visible(quiz.next_button().unwrap()));
    }

    #[test]
    fn test_correct_answer_locks_once() {
        let mut h = Harness::new();
        let mut quiz = entered(&mut h);
        run_until(&mut h, &mut quiz, QuizPhase::AwaitingNext);

        let next = quiz.next_button().unwrap();
        click(&mut h, &mut quiz, next);
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.option_count(), 2);
        assert_eq!(quiz.board_text(), Some("apakah ini pertanyaan?"));
        assert!(!h.scene.is_visible(next));

        let first = quiz.option(0).unwrap();
        click(&mut h, &mut quiz, first);
        assert_eq!(
            quiz.phase(),
            QuizPhase::Locked {
                choice: 0,
                correct: true
            }
        );
        assert_eq!(color(&h, first), hex_color(0x27ae60));
        assert_eq!(
            h.events,
            vec![StageEvent::MascotReact(Reaction::Correct)]
        );

        // Later selections change nothing
        let second = quiz.option(1).unwrap();
        click(&mut h, &mut quiz, second);
        assert_eq!(color(&h, second), hex_color(0x3498db));
        assert_eq!(h.events.len(), 1);
        // Single question: no next control after answering
        assert!(!h.scene.is_visible(next));
    }

    #[test]
    fn test_incorrect_answer_leaves_correct_option_alone() {
        let mut h = Harness::new();
        let mut quiz = entered(&mut h);
        run_until(&mut h, &mut quiz, QuizPhase::AwaitingNext);
        let next = quiz.next_button().unwrap();
        click(&mut h, &mut quiz, next);

        let second = quiz.option(1).unwrap();
        click(&mut h, &mut quiz, second);
        assert_eq!(
            quiz.phase(),
            QuizPhase::Locked {
                choice: 1,
                correct: false
            }
        );
        assert_eq!(color(&h, second), hex_color(0xe74c3c));
        assert_eq!(color(&h, quiz.option(0).unwrap()), hex_color(0x3498db));
        assert_eq!(
            h.events,
            vec![StageEvent::MascotReact(Reaction::Incorrect)]
        );
    }

    #[test]
    fn test_back_slides_out_and_finishes() {
        let mut h = Harness::new();
        let mut quiz = entered(&mut h);
        run_until(&mut h, &mut quiz, QuizPhase::Typing);

        let back = quiz.back_button().unwrap();
        click(&mut h, &mut quiz, back);
        assert_eq!(quiz.phase(), QuizPhase::Exiting);
        assert_eq!(h.events, vec![StageEvent::MascotExit]);

        // Clicks during the slide-out are ignored
        click(&mut h, &mut quiz, back);
        assert_eq!(h.events.len(), 1);

        let mut ticks = 0;
        while !quiz.is_finished() {
            quiz.advance(&mut h.stage(), DT);
            ticks += 1;
            assert!(ticks < 500);
        }
        assert_eq!(quiz.phase(), QuizPhase::Inactive);
        assert!(h.scene.is_empty());

        // Exit after finishing is a no-op
        quiz.exit_scene(&mut h.stage());
        assert_eq!(h.events.len(), 1);
        quiz.teardown(&mut h.stage());
    }

    #[test]
    fn test_answered_round_trip_repeats_exactly() {
        let mut h = Harness::new();
        let mut quiz = quiz_with(h.font(), vec![Question::sample()]);

        let mut passes = Vec::new();
        for _ in 0..2 {
            quiz.enter_scene(&mut h.stage());
            h.events.clear();
            let mut trace = Vec::new();
            while quiz.phase() != QuizPhase::AwaitingNext {
                quiz.advance(&mut h.stage(), DT);
                trace.push(quiz.snapshot(&h.stage()));
                assert!(trace.len() < 2000);
            }

            let next = quiz.next_button().unwrap();
            click(&mut h, &mut quiz, next);
            let options: Vec<NodeId> = (0..quiz.option_count())
                .filter_map(|i| quiz.option(i))
                .collect();
            let fresh: Vec<[f32; 4]> = options.iter().map(|&o| color(&h, o)).collect();

            click(&mut h, &mut quiz, options[1]);
            let locked = quiz.phase();
            let answered: Vec<[f32; 4]> = options.iter().map(|&o| color(&h, o)).collect();

            let back = quiz.back_button().unwrap();
            click(&mut h, &mut quiz, back);
            while !quiz.is_finished() {
                quiz.advance(&mut h.stage(), DT);
                trace.push(quiz.snapshot(&h.stage()));
            }
            passes.push((trace, fresh, locked, answered, h.events.clone()));
        }
        assert_eq!(passes[0], passes[1]);

        let (_, fresh, locked, answered, events) = &passes[0];
        assert_eq!(
            *locked,
            QuizPhase::Locked {
                choice: 1,
                correct: false
            }
        );
        assert_eq!(fresh, &vec![hex_color(0x3498db); 2]);
        assert_eq!(answered, &vec![hex_color(0x3498db), hex_color(0xe74c3c)]);
        assert_eq!(
            events,
            &vec![
                StageEvent::MascotReact(Reaction::Incorrect),
                StageEvent::MascotExit
            ]
        );
        assert!(h.scene.is_empty());
    }

    #[test]
    fn test_credit_link_requests_url() {
        let mut h = Harness::new();
        let mut quiz = entered(&mut h);
        let link = quiz.credit_link().unwrap();
        click(&mut h, &mut quiz, link);
        assert_eq!(
            h.events,
            vec![StageEvent::OpenLink(
                "https://www.patreon.com/quaternius".to_string()
            )]
        );
        assert_eq!(quiz.phase(), QuizPhase::BoardSliding);
    }

    #[test]
    fn test_text_waits_for_font() {
        let mut h = Harness::new();
        let font = Pending::new();
        let mut quiz = quiz_with(font.clone(), vec![Question::sample()]);
        quiz.enter_scene(&mut h.stage());
        run_until(&mut h, &mut quiz, QuizPhase::AwaitingNext);
        assert!(quiz.board_text().is_none());
        assert!(quiz.credit_link().is_none());

        font.resolve(FontAsset::helvetiker());
        quiz.advance(&mut h.stage(), DT);
        assert_eq!(quiz.board_text(), Some("Tekan berikutnya untuk memulai"));
        assert!(quiz.credit_link().is_some());
    }

    #[test]
    fn test_next_walks_multi_question_deck() {
        let mut h = Harness::new();
        let second = Question {
            prompt: "1 + 1?".to_string(),
            options: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            correct_answer: 2,
        };
        let mut quiz = quiz_with(h.font(), vec![Question::sample(), second]);
        quiz.enter_scene(&mut h.stage());
        run_until(&mut h, &mut quiz, QuizPhase::AwaitingNext);

        let next = quiz.next_button().unwrap();
        click(&mut h, &mut quiz, next);
        let first = quiz.option(0).unwrap();
        click(&mut h, &mut quiz, first);
        assert!(h.scene.is_visible(next));

        click(&mut h, &mut quiz, next);
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.option_count(), 3);
        assert_eq!(quiz.board_text(), Some("1 + 1?"));
        let middle = quiz.option(1).unwrap();
        click(&mut h, &mut quiz, middle);
        assert_eq!(
            quiz.phase(),
            QuizPhase::Locked {
                choice: 1,
                correct: true
            }
        );
        assert!(!h.scene.is_visible(next));
    }

    #[test]
    fn test_inactive_quiz_ignores_everything() {
        let mut h = Harness::new();
        let mut quiz = quiz_with(h.font(), vec![Question::sample()]);
        quiz.advance(&mut h.stage(), DT);
        let ray = h.camera.ray_from_ndc(Vec2::ZERO);
        quiz.handle_pointer(&mut h.stage(), &ray);
        quiz.exit_scene(&mut h.stage());
        assert!(h.events.is_empty());
        assert!(h.scene.is_empty());
        assert!(!quiz.is_finished());
    }
}
