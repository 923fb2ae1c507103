#![allow(dead_code)]

use chrono::Local;
use env_logger::fmt::Color;
use log::Level;
use std::{env, io::Write, path::PathBuf};

use dsstore::{Record, RecordType, Value};
use rand::{distributions::Alphanumeric, Rng};

pub fn init_logger() {
    env_logger::builder()
        .format(|buf, record: &log::Record| {
            let mut style = buf.style();
            let color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Green,
                Level::Debug => Color::Cyan,
                Level::Trace => Color::White,
            };
            style.set_color(color);
            writeln!(
                buf,
                "[{} {} {:>30}:{:^4}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                style.value(record.level()),
                record.module_path().unwrap_or(""),
                style.value(record.line().unwrap_or(0)),
                style.value(record.args())
            )
        })
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .unwrap_or(());
}

/// Unique path in the temp dir, removed when dropped.
pub struct TempPath(pub PathBuf);

impl TempPath {
    pub fn new(name: &str) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        Self(env::temp_dir().join(format!("dsstore-{}-{}", name, suffix)))
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

pub fn random_owner(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(1..24);
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

pub fn random_value(rng: &mut impl Rng, record_type: RecordType) -> Value {
    match record_type {
        RecordType::Bool => Value::Bool(rng.gen()),
        RecordType::Type => Value::Type(*b"icnv"),
        RecordType::Long => Value::Long(rng.gen()),
        RecordType::Short => Value::Short(rng.gen_range(0..=u32::from(u16::MAX))),
        RecordType::Comp => Value::Comp(rng.gen()),
        RecordType::Dutc => Value::Dutc(rng.gen()),
        RecordType::Blob => {
            let len = rng.gen_range(0..200);
            Value::blob((0..len).map(|_| rng.gen::<u8>()).collect::<Vec<_>>())
        }
        RecordType::Ustr => Value::ustr(format!("{} \u{e9} \u{1F600}", random_owner(rng))),
    }
}

pub fn random_records(rng: &mut impl Rng, amount: usize) -> Vec<Record> {
    (0..amount)
        .map(|_| {
            let record_type = RecordType::ALL[rng.gen_range(0..RecordType::ALL.len())];
            Record::new(
                random_owner(rng),
                *b"Iloc",
                random_value(rng, record_type),
            )
        })
        .collect()
}

pub fn sorted(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| a.key_cmp(b));
    records
}
