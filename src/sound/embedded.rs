//! Embedded alarm sound.
//!
//! The fallback alarm is synthesized once on first use: three short 880 Hz
//! beeps followed by a pause, encoded as a 16-bit PCM mono WAV so it goes
//! through the same decoder path as alarm files.

use std::f32::consts::TAU;
use std::sync::{Arc, OnceLock};

/// Sample rate of the embedded alarm.
const SAMPLE_RATE: u32 = 22_050;

const TONE_HZ: f32 = 880.0;
const AMPLITUDE: f32 = 0.4;
const BEEP_COUNT: u32 = 3;
const BEEP_MS: u32 = 150;
const GAP_MS: u32 = 100;
const PAUSE_MS: u32 = 650;
const FADE_MS: u32 = 5;

const WAV_HEADER_LEN: usize = 44;

static ALARM_WAV: OnceLock<Arc<[u8]>> = OnceLock::new();

/// Returns the embedded alarm as WAV bytes.
#[must_use]
pub fn get_embedded_sound() -> Arc<[u8]> {
    ALARM_WAV
        .get_or_init(|| encode_wav(&alarm_samples(), SAMPLE_RATE).into())
        .clone()
}

fn samples_for(ms: u32) -> usize {
    (SAMPLE_RATE as u64 * ms as u64 / 1000) as usize
}

/// One cycle of the alarm pattern.
fn alarm_samples() -> Vec<i16> {
    let beep_len = samples_for(BEEP_MS);
    let fade_len = samples_for(FADE_MS).max(1);
    let mut samples = Vec::new();

    for beep in 0..BEEP_COUNT {
        for i in 0..beep_len {
            let t = i as f32 / SAMPLE_RATE as f32;
            // linear fade in/out to avoid clicks
            let edge = i.min(beep_len - 1 - i);
            let envelope = (edge as f32 / fade_len as f32).min(1.0);
            let value = (TAU * TONE_HZ * t).sin() * AMPLITUDE * envelope;
            samples.push((value * i16::MAX as f32) as i16);
        }

        let silence = if beep + 1 == BEEP_COUNT { PAUSE_MS } else { GAP_MS };
        samples.resize(samples.len() + samples_for(silence), 0);
    }

    samples
}

/// Encodes mono 16-bit samples as a RIFF/WAVE byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_embedded_sound_has_riff_header() {
        let data = get_embedded_sound();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        assert_eq!(&data[12..16], b"fmt ");
        assert_eq!(&data[36..40], b"data");
    }

    #[test]
    fn test_embedded_sound_sizes_are_consistent() {
        let data = get_embedded_sound();
        assert_eq!(u32_at(&data, 4) as usize, data.len() - 8);
        assert_eq!(u32_at(&data, 40) as usize, data.len() - WAV_HEADER_LEN);
        assert_eq!(u32_at(&data, 24), SAMPLE_RATE);
    }

    #[test]
    fn test_embedded_sound_is_not_silent() {
        let data = get_embedded_sound();
        assert!(data[WAV_HEADER_LEN..].iter().any(|b| *b != 0));
    }

    #[test]
    fn test_alarm_pattern_length() {
        let expected = samples_for(BEEP_MS) * 3 + samples_for(GAP_MS) * 2 + samples_for(PAUSE_MS);
        assert_eq!(alarm_samples().len(), expected);
    }

    #[test]
    fn test_embedded_sound_is_cached() {
        let first = get_embedded_sound();
        let second = get_embedded_sound();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_encode_wav_empty() {
        let wav = encode_wav(&[], 8000);
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert_eq!(u32_at(&wav, 40), 0);
    }
}
