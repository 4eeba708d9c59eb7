//! Workload Module
//!
//! Generates fake student rows for the benchmark harnesses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::record::Student;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carla", "Dmytro", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Kateryna", "Liam", "Maya", "Nikolai", "Olga", "Pedro", "Quinn", "Rosa", "Sven", "Taras",
    "Uma", "Viktor", "Wendy", "Xavier", "Yara", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bondarenko", "Chen", "Dubois", "Evans", "Fischer", "Garcia", "Hughes",
    "Ivanenko", "Johnson", "Kowalski", "Lopez", "Moreau", "Nakamura", "Olsen", "Petrenko",
    "Quinlan", "Rossi", "Smith", "Tkachenko", "Usman", "Vargas", "Walker", "Young", "Zhang",
];

const WORDS: &[&str] = &[
    "attends", "every", "lecture", "and", "asks", "good", "questions", "needs", "more",
    "practice", "with", "joins", "consistent", "homework", "late", "strong", "project",
    "work", "improving", "steadily", "exam", "results", "excellent", "team", "player",
];

/// Deterministic or random source of student rows
pub struct WorkloadGenerator {
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Generator with a fixed seed (reproducible runs)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the OS
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A random "First Last" name; collisions are possible
    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    /// A random `YYYY-MM-DD` date
    pub fn date(&mut self) -> String {
        let year = self.rng.random_range(1990..=2024);
        let month = self.rng.random_range(1..=12);
        let day = self.rng.random_range(1..=28);
        format!("{year:04}-{month:02}-{day:02}")
    }

    /// A short sentence without separator characters
    pub fn sentence(&mut self) -> String {
        let count = self.rng.random_range(3..=8);
        let words: Vec<&str> = (0..count).map(|_| self.pick(WORDS)).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }

    /// A student with a random (possibly repeated) name
    pub fn student(&mut self) -> Student {
        let full_name = self.full_name();
        self.student_named(full_name)
    }

    /// A student whose name is unique for each `n`
    pub fn nth_student(&mut self, n: u64) -> Student {
        let full_name = format!("{} #{n}", self.full_name());
        self.student_named(full_name)
    }

    /// Fresh values for an existing student, keeping the name
    pub fn revision(&mut self, student: &Student) -> Student {
        self.student_named(student.full_name.clone())
    }

    fn student_named(&mut self, full_name: String) -> Student {
        let enrollment_date = self.date();
        let mark = f64::from(self.rng.random_range(0u32..=100));
        let comment = self.sentence();
        Student::new(full_name, enrollment_date, mark, comment)
    }

    fn pick(&mut self, items: &'static [&'static str]) -> &'static str {
        items[self.rng.random_range(0..items.len())]
    }
}
