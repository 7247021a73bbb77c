//! Interactive terminal front end.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use encounter_core::{
    Action, Actor, AdversaryPacing, AdversaryStep, AdversaryTimer, EncounterConfig, EncounterEvent,
    EventStream, GaugeKind, Phase, TurnEngine, event_channel,
};
use encounter_narration::NarrationManager;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, info};

use crate::narrate::{gauge_label, narrate_action, narrate_event};

/// Longest wait for input before the adversary clock is checked again.
const TICK: Duration = Duration::from_millis(100);

/// Narration lines kept for the story panel.
const STORY_CAPACITY: usize = 200;

const GAUGES: [(GaugeKind, Color); 3] = [
    (GaugeKind::AdversaryHealth, Color::Red),
    (GaugeKind::Aura, Color::Magenta),
    (GaugeKind::PlayerHealth, Color::Green),
];

/// Main TUI application state.
pub struct App {
    engine: TurnEngine,
    events: EventStream,
    timer: AdversaryTimer,
    narration: NarrationManager,
    story: VecDeque<String>,
    /// Narration of the outcome, once the encounter has ended.
    ending: Option<String>,
    running: bool,
}

impl App {
    /// Start an encounter from `config`. Adversary delays come from its
    /// pacing section.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: EncounterConfig, narration: NarrationManager) -> Result<Self> {
        let pacing = AdversaryPacing::from(config.pacing);
        let mut engine = TurnEngine::new(config).context("failed to start encounter")?;
        let (observer, events) = event_channel();
        engine.subscribe(observer);

        let mut app = Self {
            engine,
            events,
            timer: AdversaryTimer::new(pacing),
            narration,
            story: VecDeque::new(),
            ending: None,
            running: true,
        };
        app.announce_first_turn()?;
        Ok(app)
    }

    /// Run the TUI event loop until the user quits.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!("tui started");
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
            self.tick(Instant::now())?;
        }
        info!(outcome = %self.engine.outcome(), "tui closed");
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        let timeout = self
            .timer
            .remaining(Instant::now())
            .map_or(TICK, |remaining| remaining.min(TICK));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('a') => self.act(Action::Attack)?,
            KeyCode::Char('e') => self.act(Action::Empathy)?,
            KeyCode::Char('r') => self.reset()?,
            _ => {}
        }
        Ok(())
    }

    /// Let the adversary clock perform any step that is due.
    fn tick(&mut self, now: Instant) -> Result<()> {
        if self.timer.poll(now, &mut self.engine)? {
            self.collect_events()?;
        }
        Ok(())
    }

    fn act(&mut self, action: Action) -> Result<()> {
        let actor = match self.engine.phase() {
            Phase::AwaitingPlayer(actor) => actor,
            Phase::AdversaryActing(_) => {
                self.push_line("The adversary is acting. Wait for your turn.".to_owned());
                return Ok(());
            }
            Phase::Terminal(_) => {
                self.push_line("The encounter is over. Press r to play again.".to_owned());
                return Ok(());
            }
        };

        let line = narrate_action(&self.narration, actor, action)?;
        self.push_line(line);
        self.engine.submit(actor, action)?;
        self.collect_events()
    }

    fn reset(&mut self) -> Result<()> {
        debug!("reset requested");
        self.timer.cancel();
        self.story.clear();
        self.ending = None;
        self.engine.reset_encounter(self.engine.config().clone())?;
        // drop the reset notifications, the gauges already show full
        while self.events.try_next().is_some() {}
        self.announce_first_turn()
    }

    fn announce_first_turn(&mut self) -> Result<()> {
        let line = narrate_event(
            &self.narration,
            &EncounterEvent::TurnChanged {
                actor: self.engine.active_actor(),
            },
            &self.engine,
        )?;
        self.push_line(line);
        Ok(())
    }

    fn collect_events(&mut self) -> Result<()> {
        while let Some(event) = self.events.try_next() {
            let line = narrate_event(&self.narration, &event, &self.engine)?;
            if let EncounterEvent::Outcome { .. } = event {
                self.ending = Some(line.clone());
            }
            self.push_line(line);
        }
        Ok(())
    }

    fn push_line(&mut self, line: String) {
        if self.story.len() == STORY_CAPACITY {
            self.story.pop_front();
        }
        self.story.push_back(line);
    }

    // ── Rendering ────────────────────────────────────────────

    fn draw(&self, frame: &mut Frame) {
        let [header, adversary, aura, players, actors, story, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Line::from(format!(
                "Round {}, turn {}",
                self.engine.round(),
                self.engine.turn() + 1
            ))
            .style(Style::new().add_modifier(Modifier::BOLD)),
            header,
        );

        for ((kind, color), area) in GAUGES.into_iter().zip([adversary, aura, players]) {
            self.draw_gauge(frame, kind, color, area);
        }

        frame.render_widget(
            Paragraph::new(self.actor_line()).block(Block::bordered().title("Turn order")),
            actors,
        );
        self.draw_story(frame, story);

        frame.render_widget(
            Line::from("a attack   e empathy   r reset   q quit")
                .style(Style::new().fg(Color::DarkGray)),
            help,
        );

        if let Some(ending) = &self.ending {
            draw_ending(frame, ending);
        }
    }

    fn draw_gauge(&self, frame: &mut Frame, kind: GaugeKind, color: Color, area: Rect) {
        let gauge = self.engine.gauge(kind);
        let widget = Gauge::default()
            .block(Block::bordered().title(gauge_label(kind)))
            .gauge_style(Style::new().fg(color))
            .ratio(gauge.ratio())
            .label(format!("{:.2} / {:.2}", gauge.current(), gauge.max()));
        frame.render_widget(widget, area);
    }

    /// Actors in turn order, the active one highlighted.
    fn actor_line(&self) -> Line<'static> {
        let phase = self.engine.phase();
        let active = self.engine.active_actor();
        let over = self.engine.is_over();

        let mut spans = Vec::new();
        for &actor in &self.engine.config().turn_order {
            if !spans.is_empty() {
                spans.push(Span::raw("  >  "));
            }
            let mut label = actor.to_string();
            if actor == active
                && let Phase::AdversaryActing(step) = phase
            {
                label.push_str(match step {
                    AdversaryStep::Windup => " (winding up)",
                    AdversaryStep::Recovery => " (recovering)",
                });
            }

            let style = if actor == active && !over {
                Style::new()
                    .fg(actor_color(actor))
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::new().fg(actor_color(actor))
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    }

    fn draw_story(&self, frame: &mut Frame, area: Rect) {
        let visible = usize::from(area.height.saturating_sub(2));
        let skip = self.story.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .story
            .iter()
            .skip(skip)
            .map(|line| Line::from(line.as_str()))
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::bordered().title("Story"))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn actor_color(actor: Actor) -> Color {
    match actor {
        Actor::PlayerOne => Color::Cyan,
        Actor::PlayerTwo => Color::Yellow,
        Actor::Adversary => Color::Red,
    }
}

fn draw_ending(frame: &mut Frame, ending: &str) {
    let [row] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [popup] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(row);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(ending.to_owned()).style(Style::new().add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from("Press r to play again, q to quit."),
        ])
        .centered()
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title("Encounter over")),
        popup,
    );
}
