//! Public monitor announcement queue
//!
//! Dock calls are spoken on the lobby monitor one at a time: a chime, a
//! short pause, the spoken text, then a gap before the next announcement.
//! Browsers require a user gesture before audio may play, so the queue
//! starts locked and holds announcements until an unlock arrives.

use std::{collections::VecDeque, process::Stdio, sync::Arc};

use async_trait::async_trait;
use tokio::{process::Command, sync::mpsc, time::Duration};
use uuid::Uuid;

use crate::{
    config::MonitorConfig,
    error::{AppError, AppResult},
    services::notify::gate_display_label,
};

/// One dock call to be spoken aloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub driver_id: Uuid,
    pub license_plate: String,
    pub gate: String,
}

/// Audio playback seam; production shells out to a speech synthesizer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn speak(&self, text: &str, locale: &str, rate: f32, pitch: f32) -> AppResult<()>;
    async fn play_chime(&self) -> AppResult<()>;
}

/// Sink backed by external commands (espeak-ng and friends).
/// Completion of an utterance is the child process exiting.
pub struct CommandAudioSink {
    speech_program: String,
    chime_program: Option<String>,
}

impl CommandAudioSink {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            speech_program: config.speech_program.clone(),
            chime_program: config.chime_program.clone(),
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> AppResult<()> {
        let status = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to spawn {}: {}", program, e)))?;

        if !status.success() {
            return Err(AppError::Internal(format!(
                "{} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioSink for CommandAudioSink {
    async fn speak(&self, text: &str, locale: &str, rate: f32, pitch: f32) -> AppResult<()> {
        // espeak-ng speed is words per minute around a 175 wpm default,
        // pitch is 0-99 around a 50 default
        let args = vec![
            "-v".to_string(),
            locale.to_string(),
            "-s".to_string(),
            format!("{}", (rate * 175.0).round() as i32),
            "-p".to_string(),
            format!("{}", (pitch * 50.0).round() as i32),
            text.to_string(),
        ];
        self.run(&self.speech_program, &args).await
    }

    async fn play_chime(&self) -> AppResult<()> {
        let Some(chime) = &self.chime_program else {
            return Ok(());
        };
        let mut parts = chime.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            return Ok(());
        };
        let args: Vec<String> = parts.collect();
        self.run(&program, &args).await
    }
}

/// Spell a license plate character by character; the gap between plate
/// segments becomes a spoken pause.
pub fn spell_plate(plate: &str) -> String {
    plate
        .to_uppercase()
        .chars()
        .map(|c| {
            if c == ' ' {
                " ... ".to_string()
            } else {
                format!("{} ", c)
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Spoken text for one dock call
pub fn announcement_text(announcement: &Announcement) -> String {
    format!(
        "Perhatian. Kendaraan dengan nomor polisi {} , harap menuju ke {} sekarang. Terima kasih.",
        spell_plate(&announcement.license_plate),
        gate_display_label(&announcement.gate)
    )
}

enum AnnouncerCommand {
    Enqueue(Announcement),
    Unlock,
}

/// Handle to the announcement loop; cheap to clone, shareable with the
/// HTTP layer.
#[derive(Clone)]
pub struct Announcer {
    tx: mpsc::UnboundedSender<AnnouncerCommand>,
}

impl Announcer {
    /// Spawn the playback loop and return its handle
    pub fn spawn(sink: Arc<dyn AudioSink>, config: MonitorConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(sink, config, rx));
        Self { tx }
    }

    pub fn enqueue(&self, announcement: Announcement) {
        let _ = self.tx.send(AnnouncerCommand::Enqueue(announcement));
    }

    /// Audio unlock gesture from the monitor page
    pub fn unlock(&self) {
        let _ = self.tx.send(AnnouncerCommand::Unlock);
    }
}

async fn run(
    sink: Arc<dyn AudioSink>,
    config: MonitorConfig,
    mut rx: mpsc::UnboundedReceiver<AnnouncerCommand>,
) {
    let mut pending: VecDeque<Announcement> = VecDeque::new();
    let mut unlocked = false;

    loop {
        // Drain whatever is already queued on the channel
        loop {
            match rx.try_recv() {
                Ok(AnnouncerCommand::Enqueue(a)) => pending.push_back(a),
                Ok(AnnouncerCommand::Unlock) => unlocked = true,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return,
            }
        }

        if unlocked {
            if let Some(announcement) = pending.pop_front() {
                play_one(sink.as_ref(), &config, &announcement).await;
                continue;
            }
        }

        // Nothing playable right now, wait for the next command
        match rx.recv().await {
            Some(AnnouncerCommand::Enqueue(a)) => pending.push_back(a),
            Some(AnnouncerCommand::Unlock) => unlocked = true,
            None => return,
        }
    }
}

async fn play_one(sink: &dyn AudioSink, config: &MonitorConfig, announcement: &Announcement) {
    if let Err(e) = sink.play_chime().await {
        tracing::warn!(driver_id = %announcement.driver_id, "Chime playback failed: {}", e);
    }
    tokio::time::sleep(Duration::from_millis(config.chime_delay_ms)).await;

    let text = announcement_text(announcement);
    tracing::info!(
        driver_id = %announcement.driver_id,
        gate = %announcement.gate,
        "Announcing dock call"
    );
    if let Err(e) = sink
        .speak(&text, &config.speech_locale, config.speech_rate, config.speech_pitch)
        .await
    {
        tracing::warn!(driver_id = %announcement.driver_id, "Speech playback failed: {}", e);
    }

    tokio::time::sleep(Duration::from_millis(config.announcement_gap_ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::{sleep, Duration};

    #[test]
    fn test_spell_plate_spaces_every_character() {
        assert_eq!(spell_plate("B 1234 XYZ"), "B  ... 1 2 3 4  ... X Y Z");
        assert_eq!(spell_plate("ab 1"), "A B  ... 1");
    }

    #[test]
    fn test_announcement_text_expands_gate() {
        let text = announcement_text(&Announcement {
            driver_id: Uuid::new_v4(),
            license_plate: "B 1 A".to_string(),
            gate: "GATE_2".to_string(),
        });
        assert!(text.contains("GATE 2"));
        assert!(!text.contains("GATE_2"));
    }

    fn zero_delay_config() -> MonitorConfig {
        MonitorConfig {
            chime_delay_ms: 0,
            announcement_gap_ms: 0,
            ..MonitorConfig::default()
        }
    }

    fn announcement(plate: &str) -> Announcement {
        Announcement {
            driver_id: Uuid::new_v4(),
            license_plate: plate.to_string(),
            gate: "GATE_1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_queue_holds_until_unlocked_then_plays_fifo() {
        let spoken: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let mut sink = MockAudioSink::new();
        sink.expect_play_chime().returning(|| Ok(()));
        let record = Arc::clone(&spoken);
        sink.expect_speak().returning(move |text, _, _, _| {
            record.lock().unwrap().push(text.to_string());
            Ok(())
        });

        let announcer = Announcer::spawn(Arc::new(sink), zero_delay_config());
        announcer.enqueue(announcement("B 1 A"));
        announcer.enqueue(announcement("B 2 B"));
        sleep(Duration::from_millis(50)).await;
        assert!(spoken.lock().unwrap().is_empty(), "spoke before unlock");

        announcer.unlock();
        sleep(Duration::from_millis(100)).await;

        let spoken = spoken.lock().unwrap();
        assert_eq!(spoken.len(), 2);
        assert!(spoken[0].contains("1"));
        assert!(spoken[1].contains("2"));
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_stall_queue() {
        let spoken: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let mut sink = MockAudioSink::new();
        sink.expect_play_chime()
            .returning(|| Err(AppError::Internal("no audio device".to_string())));
        let record = Arc::clone(&spoken);
        let mut first = true;
        sink.expect_speak().returning(move |text, _, _, _| {
            if first {
                first = false;
                return Err(AppError::Internal("garbled".to_string()));
            }
            record.lock().unwrap().push(text.to_string());
            Ok(())
        });

        let announcer = Announcer::spawn(Arc::new(sink), zero_delay_config());
        announcer.unlock();
        announcer.enqueue(announcement("B 1 A"));
        announcer.enqueue(announcement("B 2 B"));
        sleep(Duration::from_millis(100)).await;

        // The first announcement failed to speak but the second one played
        assert_eq!(spoken.lock().unwrap().len(), 1);
    }
}
