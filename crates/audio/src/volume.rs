//! Lautstaerke-Skalierung fuer s16-PCM
//!
//! Wirkt direkt auf die Rohdaten vor dem Encoding, daher ohne Glaettung:
//! eine Aenderung gilt ab dem naechsten Chunk.

/// Lautstaerke-Faktor (0.0..2.0, 1.0 = normal)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    pub const MAX: f32 = 2.0;

    /// Erstellt einen Faktor; NaN wird zu 0, Werte werden auf 0..2 begrenzt
    pub fn new(faktor: f32) -> Self {
        if faktor.is_nan() {
            return Self(0.0);
        }
        Self(faktor.clamp(0.0, Self::MAX))
    }

    pub fn get(&self) -> f32 {
        self.0
    }

    /// Gibt true zurueck wenn die Samples unveraendert bleiben
    pub fn ist_neutral(&self) -> bool {
        (self.0 - 1.0).abs() < f32::EPSILON
    }

    /// Skaliert die Samples in-place (saettigend statt ueberlaufend)
    pub fn apply(&self, samples: &mut [i16]) {
        if self.ist_neutral() {
            return;
        }
        for s in samples.iter_mut() {
            let skaliert = (*s as f32 * self.0).round();
            *s = skaliert.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Wandelt s16le-Bytes in Samples um (ungerade Restbytes werden ignoriert)
pub fn s16le_zu_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_default_eins() {
        assert!(Volume::default().ist_neutral());
    }

    #[test]
    fn volume_clamp() {
        assert!((Volume::new(99.0).get() - 2.0).abs() < f32::EPSILON);
        assert!((Volume::new(-5.0).get()).abs() < f32::EPSILON);
        assert!((Volume::new(f32::NAN).get()).abs() < f32::EPSILON);
    }

    #[test]
    fn volume_halbiert() {
        let mut samples = vec![1000i16, -1000, 0];
        Volume::new(0.5).apply(&mut samples);
        assert_eq!(samples, vec![500, -500, 0]);
    }

    #[test]
    fn volume_saettigt() {
        let mut samples = vec![30_000i16, -30_000];
        Volume::new(2.0).apply(&mut samples);
        assert_eq!(samples, vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn volume_null_ist_stille() {
        let mut samples = vec![123i16; 8];
        Volume::new(0.0).apply(&mut samples);
        assert!(samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn s16le_umwandlung() {
        let samples = s16le_zu_samples(&[0x01, 0x00, 0xFF, 0xFF, 0x07]);
        assert_eq!(samples, vec![1, -1]);
    }
}
