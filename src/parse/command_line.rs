/// Split one session input line into words, honoring double quotes.
///
/// `add "Deep work" list:"My projects"` splits into three words with the
/// quotes removed. Quotes may open mid-word so `key:"two words"` stays one
/// token. An unterminated quote runs to end of line.
pub fn split_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut had_chars = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                had_chars = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if had_chars {
                    words.push(std::mem::take(&mut current));
                    had_chars = false;
                }
            }
            c => {
                current.push(c);
                had_chars = true;
            }
        }
    }
    if had_chars {
        words.push(current);
    }

    words
}
