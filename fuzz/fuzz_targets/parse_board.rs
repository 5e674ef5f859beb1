#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tabiya::chess::board::Board;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = Board::from_diagram(s) {
            assert_eq!(Board::from_diagram(&board.to_string()).unwrap(), board);
        }
    }
});
