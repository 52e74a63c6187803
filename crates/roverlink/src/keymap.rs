//! Single-character command keys for the interactive loop.

use roverlink_wire::CommandOp;

/// What a key press means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Send this command to the rover.
    Send(CommandOp),
    /// End the session.
    Quit,
    /// Not a command key; nothing is sent.
    Unknown(char),
}

/// Map a key to its action. Letters are case-insensitive.
pub fn action_for(key: char) -> KeyAction {
    match key.to_ascii_lowercase() {
        'w' => KeyAction::Send(CommandOp::Forward),
        'f' => KeyAction::Send(CommandOp::NudgeForward),
        'e' => KeyAction::Send(CommandOp::SpeedForward),
        's' => KeyAction::Send(CommandOp::Reverse),
        'b' => KeyAction::Send(CommandOp::NudgeReverse),
        'z' => KeyAction::Send(CommandOp::SpeedReverse),
        'd' => KeyAction::Send(CommandOp::TurnLeft),
        'k' => KeyAction::Send(CommandOp::SpeedLeft),
        'a' => KeyAction::Send(CommandOp::TurnRight),
        'j' => KeyAction::Send(CommandOp::SpeedRight),
        'x' => KeyAction::Send(CommandOp::Stop),
        'g' => KeyAction::Send(CommandOp::GetDistance),
        'c' => KeyAction::Send(CommandOp::GetColour),
        'p' => KeyAction::Send(CommandOp::Buzzer),
        'q' => KeyAction::Quit,
        other => KeyAction::Unknown(other),
    }
}

/// Prompt line listing the drive keys.
pub const PROMPT: &str = "Command (w=forward, s=reverse, d=left, a=right, x=stop, \
     f/b=nudge, e/z=speed, k/j=speed-turn, g=distance, c=colour, p=buzzer, q=quit)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_key_mapping() {
        let expected = [
            ('w', CommandOp::Forward),
            ('f', CommandOp::NudgeForward),
            ('e', CommandOp::SpeedForward),
            ('s', CommandOp::Reverse),
            ('b', CommandOp::NudgeReverse),
            ('z', CommandOp::SpeedReverse),
            ('d', CommandOp::TurnLeft),
            ('k', CommandOp::SpeedLeft),
            ('a', CommandOp::TurnRight),
            ('j', CommandOp::SpeedRight),
            ('x', CommandOp::Stop),
            ('g', CommandOp::GetDistance),
            ('c', CommandOp::GetColour),
            ('p', CommandOp::Buzzer),
        ];
        for (key, op) in expected {
            assert_eq!(action_for(key), KeyAction::Send(op), "key {key}");
        }
    }

    #[test]
    fn keys_are_case_insensitive() {
        assert_eq!(action_for('W'), KeyAction::Send(CommandOp::Forward));
        assert_eq!(action_for('Q'), KeyAction::Quit);
    }

    #[test]
    fn quit_key() {
        assert_eq!(action_for('q'), KeyAction::Quit);
    }

    #[test]
    fn unrecognized_keys_send_nothing() {
        assert_eq!(action_for('!'), KeyAction::Unknown('!'));
        assert_eq!(action_for('m'), KeyAction::Unknown('m'));
    }

    #[test]
    fn every_command_has_a_key() {
        let mut reachable: Vec<CommandOp> = Vec::new();
        for byte in b'a'..=b'z' {
            if let KeyAction::Send(op) = action_for(byte as char) {
                reachable.push(op);
            }
        }
        for op in CommandOp::all() {
            assert!(reachable.contains(op), "{} has no key", op.name());
        }
    }
}
