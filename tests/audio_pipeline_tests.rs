//! Audio decode pipeline tests
//!
//! Exercises base64 decoding, PCM normalization and the WAV replay path
//! through the public API.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use omnimind::audio::{
    buffer_from_data_url, create_audio_buffer, decode_base64_audio, validate_pcm, wav_data_url,
    SPEECH_SAMPLE_RATE,
};
use omnimind::DecodeError;

/// One second of a 440 Hz tone
fn tone_samples() -> Vec<i16> {
    (0..SPEECH_SAMPLE_RATE)
        .map(|i| {
            let t = i as f32 / SPEECH_SAMPLE_RATE as f32;
            ((t * 440.0 * std::f32::consts::TAU).sin() * 12_000.0) as i16
        })
        .collect()
}

/// The tone as 16-bit little-endian PCM
fn tone_pcm() -> Vec<u8> {
    tone_samples().into_iter().flat_map(i16::to_le_bytes).collect()
}

#[test]
fn test_payload_to_buffer() {
    let original = tone_samples();
    let pcm = tone_pcm();
    let payload = BASE64.encode(&pcm);

    let bytes = decode_base64_audio(&payload).unwrap();
    assert_eq!(bytes, pcm);

    let buffer = create_audio_buffer(&bytes, SPEECH_SAMPLE_RATE, 1);
    assert_eq!(buffer.frames(), SPEECH_SAMPLE_RATE as usize);
    assert!((buffer.duration_secs() - 1.0).abs() < 1e-6);

    let samples = buffer.channel(0).unwrap();
    assert_eq!(samples.len(), original.len());
    for (i, (&sample, &expected)) in samples.iter().zip(&original).enumerate() {
        assert_eq!(sample, expected as f32 / 32768.0, "sample {} differs", i);
    }
}

#[test]
fn test_decoding_is_repeatable() {
    let bytes = tone_pcm();
    let first = create_audio_buffer(&bytes, SPEECH_SAMPLE_RATE, 1);
    let second = create_audio_buffer(&bytes, SPEECH_SAMPLE_RATE, 1);
    assert_eq!(first, second);
}

#[test]
fn test_stereo_frames_are_split() {
    // Frame 0: L = -32768, R = 0; frame 1: L = 16384, R = -16384
    let bytes = [0x00, 0x80, 0x00, 0x00, 0x00, 0x40, 0x00, 0xC0];
    let buffer = create_audio_buffer(&bytes, 48_000, 2);

    assert_eq!(buffer.channel_count(), 2);
    assert_eq!(buffer.channel(0), Some(&[-1.0f32, 0.5][..]));
    assert_eq!(buffer.channel(1), Some(&[0.0f32, -0.5][..]));
}

#[test]
fn test_partial_frame_is_truncated_or_rejected() {
    let bytes = [0x00, 0x40, 0x00, 0x40, 0x11];

    let buffer = create_audio_buffer(&bytes, SPEECH_SAMPLE_RATE, 1);
    assert_eq!(buffer.frames(), 2);

    assert_eq!(
        validate_pcm(&bytes, 1),
        Err(DecodeError::PartialFrame {
            len: 5,
            frame_size: 2
        })
    );
    assert_eq!(validate_pcm(&[], 1), Err(DecodeError::EmptyPayload));
}

#[test]
fn test_wav_replay_round_trip() {
    let buffer = create_audio_buffer(&tone_pcm(), SPEECH_SAMPLE_RATE, 1);

    let url = wav_data_url(&buffer).unwrap();
    assert!(url.starts_with("data:audio/wav;base64,"));

    let restored = buffer_from_data_url(&url).unwrap();
    assert_eq!(restored, buffer);
}

#[test]
fn test_non_audio_data_url_is_rejected() {
    let url = "data:image/png;base64,AAAA";
    assert!(buffer_from_data_url(url).is_err());
}
