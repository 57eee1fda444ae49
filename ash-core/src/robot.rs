//! Conversational turn orchestrator
//!
//! Drives one user turn at a time through the mode state machine:
//!
//! ```text
//!   LISTENING ──input──► THINKING ──reply──► SPEAKING ──done──► HAPPY
//!       ▲                   │                   │                 │
//!       │                   └──────failure──────┴──► ERROR        │
//!       └────────────────recovered───────────────────┘ ◄─cooldown─┘
//! ```
//!
//! Quit words, end of console input and the interrupt flag all end in
//! SHUTDOWN. The orchestrator owns its collaborators and is strictly
//! single-threaded; the only shared state is the interrupt flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::config::MainConfig;
use crate::error::TurnError;
use crate::expression::Expression;
use crate::gesture::{classify, Gesture, Intent};
use crate::state::{Event, Mode};
use crate::traits::{ArmGestures, ConsoleInput, FaceDisplay, LanguageModel, Pacer, VoiceIo};

/// Spoken once the robot is up
pub const GREETING: &str = "Hello! I am Ash. I am ready to assist you.";
/// Spoken when the user asks to quit
pub const QUIT_FAREWELL: &str = "Goodbye! Have a great day!";
/// Spoken during teardown
pub const FAREWELL: &str = "Goodbye!";
/// Spoken after the conversation is reset
pub const FRESH_START: &str = "Okay, let's start over.";
/// Spoken when a turn fails
pub const APOLOGY: &str = "Sorry, I encountered an error.";

const STARTUP_PAUSE: Duration = Duration::from_secs(1);
const ERROR_PAUSE: Duration = Duration::from_secs(2);
const SHUTDOWN_PAUSE: Duration = Duration::from_secs(1);
const DEMO_HOLD: Duration = Duration::from_millis(1500);
const STARTUP_WAVES: u8 = 2;

const DEMO_STEPS: [(Gesture, Expression); 5] = [
    (Gesture::Neutral, Expression::Neutral),
    (Gesture::ArmsUp, Expression::Happy),
    (Gesture::ArmsDown, Expression::Neutral),
    (Gesture::Point, Expression::Thinking),
    (Gesture::wave(), Expression::Happy),
];

/// Everything the robot talks to
pub struct Collaborators {
    pub face: Box<dyn FaceDisplay>,
    pub arms: Box<dyn ArmGestures>,
    pub voice: Box<dyn VoiceIo>,
    pub console: Box<dyn ConsoleInput>,
    pub model: Box<dyn LanguageModel>,
    pub pacer: Box<dyn Pacer>,
}

/// Orchestrator tuning
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSettings {
    /// Time spent in HAPPY after each turn
    pub cooldown: Duration,
    /// Face shown while booting
    pub startup_expression: Expression,
    /// Start in voice mode when a microphone is present
    pub prefer_voice: bool,
}

impl RobotSettings {
    pub fn from_config(main: &MainConfig, text_only: bool) -> Self {
        Self {
            cooldown: main.cooldown(),
            startup_expression: main.startup_expression,
            prefer_voice: !text_only,
        }
    }
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self::from_config(&MainConfig::default(), false)
    }
}

/// A completed conversational turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub utterance: String,
    pub intent: Option<Intent>,
    pub reply: String,
}

/// Result of one pass through the loop
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Input went through the model and the reply was spoken
    Completed(Turn),
    /// Empty input or a control command; no model call
    Idle,
    /// The turn failed and the robot recovered to LISTENING
    Failed(TurnError),
    /// The robot is shutting down
    Shutdown,
}

/// The companion robot
pub struct Robot {
    parts: Collaborators,
    settings: RobotSettings,
    mode: Mode,
    use_voice: bool,
    visited: Vec<Mode>,
    interrupt: Arc<AtomicBool>,
    torn_down: bool,
}

impl Robot {
    /// Create a robot in LISTENING
    ///
    /// `interrupt` is polled at the top of every turn; setting it requests
    /// an orderly shutdown.
    pub fn new(parts: Collaborators, settings: RobotSettings, interrupt: Arc<AtomicBool>) -> Self {
        let microphone = parts.voice.microphone_available();
        if settings.prefer_voice && !microphone {
            warn!("No microphone available, using text input");
        }
        let use_voice = settings.prefer_voice && microphone;

        Self {
            parts,
            settings,
            mode: Mode::Listening,
            use_voice,
            visited: Vec::new(),
            interrupt,
            torn_down: false,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check if input comes from the microphone
    pub fn uses_voice(&self) -> bool {
        self.use_voice
    }

    /// Modes visited during the last turn, starting with LISTENING
    pub fn visited(&self) -> &[Mode] {
        &self.visited
    }

    /// Boot animation and greeting
    pub fn startup(&mut self) -> Result<(), TurnError> {
        info!(voice = self.use_voice, "Ash starting up");

        self.show(self.settings.startup_expression);
        self.parts.arms.reset()?;
        self.parts.pacer.pause(STARTUP_PAUSE);

        self.show(Expression::Happy);
        self.parts.arms.perform(Gesture::Wave {
            repetitions: STARTUP_WAVES,
        })?;
        self.say(GREETING);
        self.parts.pacer.pause(STARTUP_PAUSE);

        info!("Ash is ready");
        Ok(())
    }

    /// Run startup, then turns until shutdown, then tear down
    pub fn run(&mut self) {
        match self.startup() {
            Ok(()) => {
                while self.run_turn() != TurnOutcome::Shutdown {}
            }
            Err(e) => error!("Startup failed: {}", e),
        }
        self.shutdown();
    }

    /// Run one pass of the main loop
    pub fn run_turn(&mut self) -> TurnOutcome {
        self.visited.clear();
        self.visited.push(self.mode);

        if self.mode.is_terminal() {
            return TurnOutcome::Shutdown;
        }
        if self.interrupted() {
            info!("Interrupt received");
            self.apply(Event::ExitRequested);
            return TurnOutcome::Shutdown;
        }

        match self.try_turn() {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Turn failed: {}", e);
                self.recover();
                TurnOutcome::Failed(e)
            }
        }
    }

    /// Farewell and resource release. Runs once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        info!("Shutting down");

        // Entering SHUTDOWN shows the neutral face
        self.apply(Event::ExitRequested);
        self.say(FAREWELL);
        self.parts.pacer.pause(SHUTDOWN_PAUSE);

        if let Err(e) = self.parts.arms.reset() {
            warn!("Arm reset failed during shutdown: {}", e);
        }
        self.parts.face.clear();

        self.parts.face.close();
        self.parts.voice.close();
        self.parts.arms.close();
        info!("Shutdown complete");
    }

    fn try_turn(&mut self) -> Result<TurnOutcome, TurnError> {
        self.show(Expression::Listening);
        self.parts.arms.reset()?;

        let Some(input) = self.acquire_input() else {
            info!("End of input");
            self.apply(Event::ExitRequested);
            return Ok(TurnOutcome::Shutdown);
        };
        if self.interrupted() {
            info!("Interrupt received");
            self.apply(Event::ExitRequested);
            return Ok(TurnOutcome::Shutdown);
        }

        match Command::parse(&input) {
            Command::Empty => Ok(TurnOutcome::Idle),
            Command::UseText => {
                self.use_voice = false;
                info!("Switched to text input");
                Ok(TurnOutcome::Idle)
            }
            Command::UseVoice => {
                if self.parts.voice.microphone_available() {
                    self.use_voice = true;
                    info!("Switched to voice input");
                } else {
                    warn!("No microphone available, staying in text mode");
                }
                Ok(TurnOutcome::Idle)
            }
            Command::Quit => {
                self.show(Expression::Happy);
                self.say(QUIT_FAREWELL);
                self.apply(Event::ExitRequested);
                Ok(TurnOutcome::Shutdown)
            }
            Command::GestureDemo => {
                self.gesture_demo()?;
                Ok(TurnOutcome::Idle)
            }
            Command::Reset => {
                self.parts.model.reset_conversation();
                info!("Conversation reset");
                self.say(FRESH_START);
                Ok(TurnOutcome::Idle)
            }
            Command::Utterance => self.converse(input.trim()).map(TurnOutcome::Completed),
        }
    }

    fn acquire_input(&mut self) -> Option<String> {
        if !self.use_voice {
            return self.parts.console.read_line("You: ");
        }

        info!("Listening...");
        match self.parts.voice.listen() {
            Ok(text) => {
                info!(heard = %text, "Recognized speech");
                Some(text)
            }
            Err(e) => {
                warn!("Speech recognition failed: {}", e);
                Some(String::new())
            }
        }
    }

    fn converse(&mut self, utterance: &str) -> Result<Turn, TurnError> {
        let intent = classify(utterance);
        debug!(?intent, "Classified utterance");

        self.apply(Event::InputReceived);
        self.parts.arms.perform(Gesture::Point)?;
        let reply = self.parts.model.ask(utterance)?;
        info!(%reply, "Model replied");

        self.apply(Event::ResponseReceived);
        if let Some(intent) = intent {
            self.parts.arms.perform(intent.gesture())?;
        }
        self.say(&reply);

        self.apply(Event::PlaybackComplete);
        if !intent.is_some_and(|i| i.persists()) {
            self.parts.arms.perform(Gesture::ArmsUp)?;
        }
        self.parts.pacer.pause(self.settings.cooldown);
        self.apply(Event::CooldownElapsed);

        Ok(Turn {
            utterance: utterance.to_string(),
            intent,
            reply,
        })
    }

    fn gesture_demo(&mut self) -> Result<(), TurnError> {
        info!("Gesture demo");
        for (gesture, expression) in DEMO_STEPS {
            debug!(%gesture, %expression, "Demo step");
            self.show(expression);
            self.parts.arms.perform(gesture)?;
            self.parts.pacer.pause(DEMO_HOLD);
        }
        self.show(Expression::Happy);
        self.parts.arms.reset()?;
        Ok(())
    }

    fn recover(&mut self) {
        self.apply(Event::TurnFailed);
        self.say(APOLOGY);
        self.parts.pacer.pause(ERROR_PAUSE);
        self.apply(Event::Recovered);
    }

    fn apply(&mut self, event: Event) {
        let next = self.mode.transition(event);
        if next == self.mode {
            return;
        }
        debug!(from = %self.mode, to = %next, ?event, "Mode change");
        self.mode = next;
        self.visited.push(next);
        self.show(next.expression());
    }

    fn show(&mut self, expression: Expression) {
        if !self.parts.face.set_expression(expression) {
            debug!(%expression, "Expression not shown");
        }
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = self.parts.voice.speak(text) {
            warn!("Speech output failed: {}", e);
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}
