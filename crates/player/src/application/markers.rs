//! Marker board for the live map.

use trailhunt_domain::Marker;

/// Markers shown on the live map.
///
/// Each fetch replaces the whole set; markers are never merged or patched.
#[derive(Debug, Clone, Default)]
pub struct MarkerBoard {
    markers: Vec<Marker>,
    generation: u64,
}

impl MarkerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched set and return the new generation.
    pub fn replace(&mut self, markers: Vec<Marker>) -> u64 {
        self.markers = markers;
        self.generation += 1;
        tracing::debug!(
            count = self.markers.len(),
            generation = self.generation,
            "Marker board replaced"
        );
        self.generation
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(lat: f64, colour: &str) -> Marker {
        Marker {
            lat,
            lng: -2.59,
            colour: colour.to_string(),
            title: None,
            subtitle: None,
            pin_icon: None,
        }
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut board = MarkerBoard::new();
        assert_eq!(board.replace(vec![marker(51.0, "red"), marker(51.1, "blue")]), 1);
        assert_eq!(board.replace(vec![marker(52.0, "green")]), 2);

        assert_eq!(board.markers().len(), 1);
        assert_eq!(board.markers()[0].colour, "green");
    }

    #[test]
    fn test_clear_bumps_generation() {
        let mut board = MarkerBoard::new();
        board.replace(vec![marker(51.0, "red")]);
        board.clear();
        assert!(board.markers().is_empty());
        assert_eq!(board.generation(), 2);
    }
}
