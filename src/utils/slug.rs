/// Generates a URL-friendly slug from a title: lowercase, special
/// characters stripped, whitespace and underscores collapsed to hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for ch in title.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            slug.push(lower);
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '_' || ch == '-') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Intro to Python"), "intro-to-python");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(slugify("Loops & Iteration (Part 2)!"), "loops-iteration-part-2");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  print()   basics__again  "), "print-basics-again");
    }

    #[test]
    fn empty_title_gives_empty_slug() {
        assert_eq!(slugify("!!!"), "");
    }
}
