use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 44_100;

/// Renders `duration_ms` of mono audio by sampling `voice` at each instant.
fn render(duration_ms: u32, mut voice: impl FnMut(f32) -> f32) -> Vec<f32> {
    let samples = (SAMPLE_RATE * duration_ms / 1000) as usize;
    (0..samples)
        .map(|i| voice(i as f32 / SAMPLE_RATE as f32))
        .collect()
}

fn sine(t: f32, frequency: f32) -> f32 {
    (t * frequency * TAU).sin()
}

pub fn create_beep_sound() -> Vec<f32> {
    render(180, |t| {
        let fade_in = (t / 0.01).min(1.0);
        let fade_out = ((0.18 - t) / 0.03).clamp(0.0, 1.0);
        sine(t, 880.0) * 0.3 * fade_in * fade_out
    })
}

pub fn create_wood_block_sound() -> Vec<f32> {
    render(160, |t| {
        let envelope = (-t * 18.0).exp();
        (sine(t, 1200.0) * 0.3 + sine(t, 760.0) * 0.2) * envelope
    })
}

pub fn create_cowbell_sound() -> Vec<f32> {
    const PARTIALS: [(f32, f32); 4] = [(1.0, 0.4), (1.48, 0.3), (2.1, 0.2), (2.9, 0.1)];
    render(300, |t| {
        let envelope = (-t * 9.0).exp();
        PARTIALS
            .iter()
            .map(|&(ratio, gain)| sine(t, 560.0 * ratio) * gain)
            .sum::<f32>()
            * envelope
    })
}

pub fn create_triangle_sound() -> Vec<f32> {
    render(400, |t| {
        let phase = (t * 1320.0) % 1.0;
        let wave = if phase < 0.5 {
            4.0 * phase - 1.0
        } else {
            3.0 - 4.0 * phase
        };
        wave * 0.3 * (-t * 6.0).exp()
    })
}

pub fn create_kick_sound() -> Vec<f32> {
    render(250, |t| {
        let envelope = (-t * 10.0).exp();
        let frequency = 50.0 + 90.0 * (-t * 25.0).exp();
        sine(t, frequency) * envelope * 0.6
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_is_audible_and_unclipped() {
        for (name, samples) in [
            ("beep", create_beep_sound()),
            ("wood block", create_wood_block_sound()),
            ("cowbell", create_cowbell_sound()),
            ("triangle", create_triangle_sound()),
            ("kick", create_kick_sound()),
        ] {
            assert!(!samples.is_empty(), "{name} is empty");
            let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
            assert!(peak > 0.05, "{name} is silent");
            assert!(peak <= 1.0, "{name} clips at {peak}");
        }
    }

    #[test]
    fn render_length_follows_duration() {
        assert_eq!(render(1000, |_| 0.0).len(), SAMPLE_RATE as usize);
        assert_eq!(render(0, |_| 0.0).len(), 0);
    }
}
