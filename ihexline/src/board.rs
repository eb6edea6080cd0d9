//! Supported target boards and the signature string each one answers with.

use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Board {
    ArduinoUno,
    ArduinoNano,
    ArduinoMega,
    Stm32f103,
}

impl Board {
    pub const ALL: [Self; 4] = [
        Self::ArduinoUno,
        Self::ArduinoNano,
        Self::ArduinoMega,
        Self::Stm32f103,
    ];

    /// Name shown in board pickers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ArduinoUno => "Arduino UNO",
            Self::ArduinoNano => "Arduino Nano",
            Self::ArduinoMega => "Arduino Mega",
            Self::Stm32f103 => "STM32F103",
        }
    }

    /// Signature sent to the device. Sent verbatim, followed by a newline.
    #[must_use]
    pub const fn signature(&self) -> &'static str {
        match self {
            Self::ArduinoUno => "ARDUINO_UNO_R3",
            Self::ArduinoNano => "ARDUINO_NANO",
            Self::ArduinoMega => "ARDUINO_MEGA",
            Self::Stm32f103 => "STM32F103",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBoard(pub String);

impl fmt::Display for UnknownBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown board: '{}'", self.0)
    }
}

impl std::error::Error for UnknownBoard {}

impl FromStr for Board {
    type Err = UnknownBoard;

    /// Accepts the display name or the signature, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s) || b.signature().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBoard(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        assert_eq!(Board::ArduinoUno.signature(), "ARDUINO_UNO_R3");
        assert_eq!(Board::ArduinoNano.signature(), "ARDUINO_NANO");
        assert_eq!(Board::ArduinoMega.signature(), "ARDUINO_MEGA");
        assert_eq!(Board::Stm32f103.signature(), "STM32F103");
    }

    #[test]
    fn test_from_str_by_name_and_signature() {
        assert_eq!("Arduino UNO".parse(), Ok(Board::ArduinoUno));
        assert_eq!("arduino nano".parse(), Ok(Board::ArduinoNano));
        assert_eq!("ARDUINO_MEGA".parse(), Ok(Board::ArduinoMega));
        assert_eq!(" stm32f103 ".parse(), Ok(Board::Stm32f103));
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(
            "ESP32".parse::<Board>(),
            Err(UnknownBoard("ESP32".to_string()))
        );
        assert!("".parse::<Board>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for board in Board::ALL {
            assert_eq!(board.to_string().parse(), Ok(board));
        }
    }
}
