use std::io::Write;

use agrolink_core::{
    lookup, Command, Language, MessageKey, SpeechRecognizer, SpeechSynthesizer, VoiceError,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads typed lines from stdin as if they were final transcripts.
pub struct ConsoleRecognizer {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleRecognizer {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    async fn next_final(&mut self, language: Language) -> Result<Option<Command>, VoiceError> {
        print!(
            "[{}] {} ",
            language.speech_tag(),
            lookup(MessageKey::Listening, language)
        );
        std::io::stdout()
            .flush()
            .map_err(|error| VoiceError::Transcription(error.to_string()))?;

        let line = self
            .lines
            .next_line()
            .await
            .map_err(|error| VoiceError::Transcription(error.to_string()))?;

        Ok(line
            .map(|line| line.trim().to_string())
            .filter(|line| !line.eq_ignore_ascii_case("exit") && !line.eq_ignore_ascii_case("quit"))
            .map(|line| Command::new(line, language)))
    }

    fn stop(&mut self) {
        println!();
    }
}

/// Prints replies instead of speaking them.
#[derive(Debug, Default)]
pub struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    async fn speak(&mut self, text: &str, language: Language) -> Result<(), VoiceError> {
        println!("[{}] {text}", language.speech_tag());
        Ok(())
    }
}
