/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from the `[gamepad]` section of config.toml.
/// Default mapping:
///   A (South)  →  button A
///   B (East)   →  button B
///   X (West)   →  button X
///   Y (North)  →  button Y

#[cfg(feature = "gamepad")]
use gilrs::{EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::info;

use crate::config::ButtonBindings;
use crate::domain::button::Button;

/// Physical pad buttons that can be bound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: gilrs::Button) -> Option<Btn> {
        use gilrs::Button as G;
        match btn {
            G::South     => Some(Btn::A),
            G::East      => Some(Btn::B),
            G::West      => Some(Btn::X),
            G::North     => Some(Btn::Y),
            G::LeftTrigger  => Some(Btn::L1),
            G::RightTrigger => Some(Btn::R1),
            G::LeftTrigger2  => Some(Btn::L2),
            G::RightTrigger2 => Some(Btn::R2),
            G::Start     => Some(Btn::Start),
            G::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    held: [bool; BTN_COUNT],

    /// Pad buttons bound to each game button, in button order.
    bindings: [Vec<Btn>; 4],

    pub connected: bool,
}

impl GamepadState {
    pub fn new(bindings: &ButtonBindings) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        let lists = bindings.lists();
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            held: [false; BTN_COUNT],
            bindings: std::array::from_fn(|i| {
                lists[i].iter().filter_map(|s| Btn::from_name(s)).collect()
            }),
            connected,
        }
    }

    pub fn update(&mut self) {
        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.set_held(b, true);
                    }
                }
                EventType::ButtonReleased(btn, _) => {
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.set_held(b, false);
                    }
                }
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn set_held(&mut self, btn: Btn, held: bool) {
        self.held[btn as usize] = held;
    }

    /// Is any pad button bound to `button` held?
    pub fn is_held(&self, button: Button) -> bool {
        self.bindings[button.index()]
            .iter()
            .any(|&b| self.held[b as usize])
    }

    pub fn release_all(&mut self) {
        self.held = [false; BTN_COUNT];
    }
}
