//! Name normalization shared by signup and the business/order routes.

/// Title-case a string: a cased letter that follows a cased letter is
/// lowercased, every other character gets its titlecase form.
///
/// Business names are always stored and compared in this form, so
/// `"acme widgets"`, `"ACME WIDGETS"` and `"Acme Widgets"` all name the same
/// business.
///
/// Titlecase is not uppercase for every letter: `ß` becomes `Ss`, the
/// digraph `ǆ` becomes `ǅ`, and Georgian letters keep their form. Letters
/// without case (CJK, digits) neither start nor end a word.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_cased = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if prev_is_cased {
            if c == 'Σ' && !followed_by_cased(chars.clone()) {
                out.push('ς');
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            push_titlecase(&mut out, c);
        }
        prev_is_cased = is_cased(c);
    }

    out
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase() || is_titlecase_letter(c)
}

fn is_titlecase_letter(c: char) -> bool {
    matches!(
        c,
        '\u{01C5}'
            | '\u{01C8}'
            | '\u{01CB}'
            | '\u{01F2}'
            | '\u{1F88}'..='\u{1F8F}'
            | '\u{1F98}'..='\u{1F9F}'
            | '\u{1FA8}'..='\u{1FAF}'
            | '\u{1FBC}'
            | '\u{1FCC}'
            | '\u{1FFC}'
    )
}

/// Punctuation that may sit inside a word without ending it.
fn is_case_ignorable(c: char) -> bool {
    matches!(
        c,
        '\'' | '.'
            | ':'
            | '^'
            | '`'
            | '\u{00AD}'
            | '\u{00B7}'
            | '\u{2018}'
            | '\u{2019}'
            | '\u{2024}'
            | '\u{2027}'
    )
}

fn followed_by_cased(rest: impl Iterator<Item = char>) -> bool {
    rest.skip_while(|&c| is_case_ignorable(c))
        .next()
        .is_some_and(is_cased)
}

fn push_titlecase(out: &mut String, c: char) {
    let mapped: &str = match c {
        '\u{01C4}'..='\u{01C6}' => "\u{01C5}",
        '\u{01C7}'..='\u{01C9}' => "\u{01C8}",
        '\u{01CA}'..='\u{01CC}' => "\u{01CB}",
        '\u{01F1}'..='\u{01F3}' => "\u{01F2}",
        'ß' => "Ss",
        'ﬀ' => "Ff",
        'ﬁ' => "Fi",
        'ﬂ' => "Fl",
        'ﬃ' => "Ffi",
        'ﬄ' => "Ffl",
        'ﬅ' | 'ﬆ' => "St",
        '\u{0587}' => "\u{0535}\u{0582}",
        '\u{FB13}' => "\u{0544}\u{0576}",
        '\u{FB14}' => "\u{0544}\u{0565}",
        '\u{FB15}' => "\u{0544}\u{056B}",
        '\u{FB16}' => "\u{054E}\u{0576}",
        '\u{FB17}' => "\u{0544}\u{056D}",
        '\u{1FB2}' => "\u{1FBA}\u{0345}",
        '\u{1FB4}' => "\u{0386}\u{0345}",
        '\u{1FB7}' => "\u{0391}\u{0342}\u{0345}",
        '\u{1FC2}' => "\u{1FCA}\u{0345}",
        '\u{1FC4}' => "\u{0389}\u{0345}",
        '\u{1FC7}' => "\u{0397}\u{0342}\u{0345}",
        '\u{1FF2}' => "\u{1FFA}\u{0345}",
        '\u{1FF4}' => "\u{038F}\u{0345}",
        '\u{1FF7}' => "\u{03A9}\u{0342}\u{0345}",
        // Greek letters with iota subscript map to their own titlecase block
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            if let Some(title) = char::from_u32(c as u32 + 8) {
                out.push(title);
            }
            return;
        }
        '\u{1FB3}' => "\u{1FBC}",
        '\u{1FC3}' => "\u{1FCC}",
        '\u{1FF3}' => "\u{1FFC}",
        // Georgian Mkhedruli has an uppercase (Mtavruli) but no titlecase
        '\u{10D0}'..='\u{10FA}' | '\u{10FD}'..='\u{10FF}' => {
            out.push(c);
            return;
        }
        c if is_titlecase_letter(c) => {
            out.push(c);
            return;
        }
        _ => {
            out.extend(c.to_uppercase());
            return;
        }
    };

    out.push_str(mapped);
}
