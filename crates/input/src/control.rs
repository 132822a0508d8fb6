use surfaces_camera::Movement;

/// A logical control the demo reacts to.
///
/// Applications map physical keys onto controls; the camera only ever
/// sees [`Movement`]s derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    /// Speed modifier, held together with a movement control.
    Boost,
}

impl Control {
    pub fn movement(self) -> Option<Movement> {
        match self {
            Control::Forward => Some(Movement::Forward),
            Control::Backward => Some(Movement::Backward),
            Control::Left => Some(Movement::Left),
            Control::Right => Some(Movement::Right),
            Control::Up => Some(Movement::Up),
            Control::Down => Some(Movement::Down),
            Control::Boost => None,
        }
    }
}

impl From<Movement> for Control {
    fn from(movement: Movement) -> Self {
        match movement {
            Movement::Forward => Control::Forward,
            Movement::Backward => Control::Backward,
            Movement::Left => Control::Left,
            Movement::Right => Control::Right,
            Movement::Up => Control::Up,
            Movement::Down => Control::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_movement_maps_back_to_itself() {
        for movement in Movement::ALL {
            assert_eq!(Control::from(movement).movement(), Some(movement));
        }
    }

    #[test]
    fn boost_is_not_a_movement() {
        assert!(Control::Boost.movement().is_none());
    }
}
