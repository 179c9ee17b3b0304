//! Word Defenders: spell the word before its letters hit the ground

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::config::GameKind;
use crate::renderer::{Color, Frame, Layer};
use crate::sim::{Game, InputEvent, Key, PressQueue, Session, seeded_rng};

pub const WORDS: [&str; 8] = ["HELLO", "WORLD", "GAME", "PLAY", "FUN", "CODE", "WEB", "APP"];

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const LETTER_MARGIN: f32 = 40.0;
const FIRST_LETTER_Y: f32 = -50.0;
const LETTER_GAP: f32 = 30.0;
const WORD_POINTS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingLetter {
    pub ch: char,
    pub x: f32,
    pub y: f32,
    /// Pixels per tick
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Letter(char),
    Erase,
    Clear,
}

pub struct WordDefenders {
    rng: Pcg32,
    word: String,
    letters: Vec<FallingLetter>,
    typed: String,
    commands: PressQueue<Command>,
}

impl WordDefenders {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: seeded_rng(seed),
            word: String::new(),
            letters: Vec::new(),
            typed: String::new(),
            commands: PressQueue::default(),
        };
        game.next_word();
        game
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn letters(&self) -> &[FallingLetter] {
        &self.letters
    }

    /// Start a specific word (uppercased)
    pub fn set_word(&mut self, word: &str) {
        self.word = word.to_uppercase();
        self.drop_letters();
    }

    pub fn letters_mut(&mut self) -> &mut [FallingLetter] {
        &mut self.letters
    }

    fn next_word(&mut self) {
        let word = WORDS.choose(&mut self.rng).copied().unwrap_or(WORDS[0]);
        self.word = word.to_string();
        self.drop_letters();
    }

    fn drop_letters(&mut self) {
        self.typed.clear();
        self.letters = self
            .word
            .chars()
            .enumerate()
            .map(|(i, ch)| FallingLetter {
                ch,
                x: self.rng.random_range(0.0..WIDTH - LETTER_MARGIN),
                y: FIRST_LETTER_Y - i as f32 * LETTER_GAP,
                speed: self.rng.random_range(1.0..3.0),
            })
            .collect();
    }

    fn type_letter(&mut self, ch: char, session: &mut Session) {
        let mut attempt = self.typed.clone();
        attempt.push(ch);
        if !self.word.starts_with(&attempt) {
            session.sound(SoundEffect::Wrong);
            return;
        }
        self.typed = attempt;

        if self.typed == self.word {
            let level = session.level();
            session.award(WORD_POINTS * level as u64);
            session.set_level(level + 1);
            session.sound(SoundEffect::Correct);
            session.celebrate(WIDTH / 2.0, 50.0);
            log::debug!("Word Defenders spelled {}, level {}", self.word, level + 1);
            self.next_word();
        }
    }
}

impl Game for WordDefenders {
    fn kind(&self) -> GameKind {
        GameKind::WordDefenders
    }

    fn letter_input(&self) -> bool {
        true
    }

    fn reset(&mut self, _session: &mut Session) {
        self.commands.clear();
        self.next_word();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let command = match event.pressed() {
            Some(Key::Backspace) => Command::Erase,
            Some(Key::Enter) => Command::Clear,
            Some(Key::Char(c)) if c.is_ascii_alphabetic() => Command::Letter(c.to_ascii_uppercase()),
            _ => return,
        };
        self.commands.push(command);
    }

    fn update(&mut self, session: &mut Session, _dt: f32) {
        let commands: Vec<Command> = self.commands.drain().collect();
        for command in commands {
            match command {
                Command::Letter(c) => self.type_letter(c, session),
                Command::Erase => {
                    self.typed.pop();
                }
                Command::Clear => self.typed.clear(),
            }
        }

        for letter in self.letters.iter_mut() {
            letter.y += letter.speed;
        }
        let before = self.letters.len();
        self.letters.retain(|l| l.y <= HEIGHT);
        for _ in self.letters.len()..before {
            if session.lose_life() {
                return;
            }
        }

        if self.letters.is_empty() {
            log::debug!("Word Defenders lost the word {}", self.word);
            self.next_word();
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        frame.centered_text(Layer::Board, 50.0, self.word.clone(), 24.0, Color::hex(0xffff00));

        for letter in &self.letters {
            frame.text(
                Layer::Entities,
                letter.x,
                letter.y,
                letter.ch.to_string(),
                24.0,
                Color::hex(0x00ffff),
            );
        }

        frame.centered_text(
            Layer::Player,
            HEIGHT - 50.0,
            format!("Typed: {}", self.typed),
            18.0,
            Color::WHITE,
        );
    }

    fn clear_input(&mut self) {
        self.commands.clear();
    }
}
