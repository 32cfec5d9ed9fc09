use std::collections::HashMap;
use std::convert::Infallible;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use qre::{
    Config, Error, MatchList, MatchResult, Matcher, MultiMatcher, PatternError, Registry, Value,
};

fn full(pattern: &str, haystack: &str) -> MatchResult {
    qre::match_full(pattern, haystack, true).unwrap()
}

fn named(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(n, v)| (n.to_string(), v.clone()))
        .collect()
}

#[test]
fn readme_opener() {
    assert_eq!(
        full("He* [planet]!", "Hello World!").named(),
        named(&[("planet", Value::from("World"))])
    );
    assert_eq!(
        full("It* [temp:float]?°C *", "It's -10.2 °C outside!").get("temp"),
        Some(&Value::Float(-10.2))
    );
}

#[test]
fn readme_basic_usage() {
    let m = Matcher::new("Invoice+*[year:4]+[month:2]+[day:2].pdf").unwrap();
    let expected = named(&[
        ("year", Value::from("2021")),
        ("month", Value::from("01")),
        ("day", Value::from("15")),
    ]);
    assert_eq!(m.match_full("Invoice_RE2321_2021_01_15.pdf").unwrap().named(), expected);
    assert_eq!(m.match_full("Invoice RE2321 2021-01-15.pdf").unwrap().named(), expected);

    let typed = Matcher::new("Invoice+*[date:date].pdf").unwrap();
    assert_eq!(
        typed.match_full("Invoice RE2321 2021-01-15.pdf").unwrap().get("date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2021, 1, 15).unwrap()))
    );

    assert!(full("ABC-[value:int]", "ABC-13").is_match());
}

#[test]
fn readme_type_hints() {
    let m = Matcher::new("[year:int]-[month:int]: [value:float]").unwrap();
    assert_eq!(
        m.match_full("2021-01: -12.786").unwrap().named(),
        named(&[
            ("year", Value::Int(2021)),
            ("month", Value::Int(1)),
            ("value", Value::Float(-12.786)),
        ])
    );
    assert!(!m.match_full("2021-01-abc: Hello").unwrap().is_match());
    assert!(m.match_full("1234-01: 123.123").unwrap().is_match());
    assert_eq!(
        m.regex(),
        r"(?P<year>[+-]?[0-9]+)\-(?P<month>[+-]?[0-9]+): (?P<value>[+-]?(?:[0-9]*[.])?[0-9]+)"
    );
}

#[test]
fn readme_samples() {
    assert!(full("* pattern", "First pattern").is_match());
    assert_eq!(
        full("World's [] pattern", "World's coolest pattern").unnamed(),
        &[Value::from("coolest")]
    );

    let order = qre::match_full(
        "product id: [product_id], units: [units: int], price: [unit_price: decimal]",
        "Product ID: A123, Units: 3, Price: 1.23",
        false,
    )
    .unwrap();
    assert_eq!(
        order.named(),
        named(&[
            ("product_id", Value::from("A123")),
            ("units", Value::Int(3)),
            ("unit_price", Value::Decimal("1.23".parse::<Decimal>().unwrap())),
        ])
    );
}

#[test]
fn readme_register_type() {
    qre::register_type("mood", "[😀😞]", |emoji: &str| {
        Ok::<_, Infallible>(match emoji {
            "😀" => "good",
            "😞" => "bad",
            _ => "unknown",
        })
    })
    .unwrap();

    let result = qre::search("[mood:mood]", "I'm feeling 😀 today!", true).unwrap();
    assert_eq!(result.named(), named(&[("mood", Value::from("good"))]));
}

#[test]
fn readme_matcher_alternation() {
    let m = Matcher::with_config(
        "value: [quantitative:float]|[qualitative]",
        Config::new().case_sensitive(false),
    )
    .unwrap();

    assert_eq!(
        m.match_full("Value: 1.0").unwrap().named(),
        named(&[("quantitative", Value::Float(1.0))])
    );
    assert_eq!(
        m.match_full("Pretty good").unwrap().named(),
        named(&[("qualitative", Value::from("Pretty good"))])
    );
    assert_eq!(
        m.regex(),
        "(?:value: (?P<quantitative>[+-]?(?:[0-9]*[.])?[0-9]+))|(?:(?P<qualitative>.*))"
    );
}

#[test]
fn match_patterns() {
    for (pattern, haystack, hit) in [
        // wildcards
        ("*.py", "hello.py", true),
        ("*.zip", "hello.py", false),
        ("++.py", "yo.py", true),
        ("+++.py", "yo.py", false),
        ("yo???.py", "yo12.py", true),
        ("yo???.py", "yo1234.py", false),
        // alternation
        ("a|b", "a", true),
        ("a|b", "c", false),
        ("[:int]|[:float]", "1", true),
        ("[:int]|[:float]", "1.0", true),
        // escapes
        ("[[brackets]]", "[brackets]", true),
        ("real[*]times", "real*times", true),
        ("real[*]times", "real+times", false),
        ("real[+]plus", "real+plus", true),
        ("real[+]plus", "real-plus", false),
        ("real[?]question mark", "real?question mark", true),
        ("real[?]question mark", "real!question mark", false),
        ("real[|]pipe", "real|pipe", true),
        ("real[|]pipe", "real!pipe", false),
        ("[[|(", "[", true),
        ("[[|(", "(", true),
        // groups
        ("[file].py", "hello.py", true),
        ("[file].zip", "hello.py", false),
        ("[folder]/[filename].js", "foo/bar.js", true),
        ("*.[extension]", "/root/folder/file.exe", true),
        ("[folder]/[filename].[extension]", "test/123.pdf", true),
        ("[]/[filename][?][]", "www.site.com/home/hello.js?p=1", true),
        // widths
        ("[:4][:2]", "123456", true),
        ("[:4][:2]", "12345", false),
        ("[a:4][b:2]", "123456", true),
        ("[a:4][b:2]", "12345", false),
        // unicode
        ("*.p?", "whatevör.pü", true),
        ("*.[:letters]", "whatevör.pü", true),
        ("*.[:letters]", "whatevör.p¥", false),
    ] {
        assert_eq!(
            full(pattern, haystack).is_match(),
            hit,
            "{pattern:?} against {haystack:?}"
        );
    }
}

#[test]
fn unnamed_groups() {
    assert_eq!(
        full("[] [:int]", "Lesson 1").unnamed(),
        &[Value::from("Lesson"), Value::Int(1)]
    );
    assert_eq!(
        full("[] sees []", "Tim sees Jacob").unnamed(),
        &[Value::from("Tim"), Value::from("Jacob")]
    );
    assert_eq!(
        full("[:int] [:float] [:int]", "1 2.3 4").unnamed(),
        &[Value::Int(1), Value::Float(2.3), Value::Int(4)]
    );
    assert!(full("[].py", "hello.__").unnamed().is_empty());
}

#[test]
fn named_and_unnamed_together() {
    let result = full("[]/[filename][?][]", "www.site.com/home/hello.js?p=1");
    assert_eq!(result.named(), named(&[("filename", Value::from("hello.js"))]));
    assert_eq!(
        result.unnamed(),
        &[Value::from("www.site.com/home"), Value::from("p=1")]
    );

    assert_eq!(
        full("[folder]/[file_name][file_id: int].py", "home/hello1.py").named(),
        named(&[
            ("folder", Value::from("home")),
            ("file_name", Value::from("hello")),
            ("file_id", Value::Int(1)),
        ])
    );
    assert_eq!(
        full("[a:2][b:3]", "12345").named(),
        named(&[("a", Value::from("12")), ("b", Value::from("345"))])
    );
    assert_eq!(
        full("*/[filename]+js", "home/hello.js").named(),
        named(&[("filename", Value::from("hello"))])
    );
}

#[test]
fn no_match_is_falsy() {
    let result = full("[folder]/[filename][?][params]", "hello.js?p=1");
    assert!(!result.is_match());
    assert!(result.is_empty());

    let partial = full("[name:letters] is []", "Tim is");
    assert!(!partial.is_match());
}

#[test]
fn search_all_occurrences() {
    assert!(!qre::search_all("nugget", "There is a nugget of information", true)
        .unwrap()
        .is_empty());
    assert!(qre::search_all("no nugget", "Can't find any nuggets of information", true)
        .unwrap()
        .is_empty());
    assert_eq!(
        qre::search_all("nuggets", "There are nuggets and nuggets of information", true)
            .unwrap()
            .len(),
        2
    );

    let words: Vec<_> = qre::search_all("[:letters]", "Many hits here", true)
        .unwrap()
        .iter()
        .map(|r| r.unnamed().to_vec())
        .collect();
    assert_eq!(
        words,
        vec![
            vec![Value::from("Many")],
            vec![Value::from("hits")],
            vec![Value::from("here")],
        ]
    );
}

#[test]
fn several_patterns() {
    let loose = MultiMatcher::new(&["Key [key:letters]", "Value [value:int]"], Config::new(), false)
        .unwrap();
    assert_eq!(
        loose.search("Key A").unwrap().named(),
        named(&[("key", Value::from("A"))])
    );

    let strict = MultiMatcher::new(&["One", "Three"], Config::new(), true).unwrap();
    assert!(!strict.search("Two").unwrap().is_match());
    assert!(!strict.search("One Two").unwrap().is_match());
    assert!(strict.search("One Two Three").unwrap().is_match());
}

#[test]
fn replace_groups() {
    let result = full("[folder]/[filename][?][]", "home/hello.js?p=1");

    let renamed = result
        .replace_named(&HashMap::from([("filename", "index.html")]))
        .unwrap();
    assert_eq!(renamed, "home/index.html?p=1");
}

#[test]
fn replace_outlives_the_matched_string() {
    let haystack = String::from("größe: 12 grün");
    let result = full("[key]: [:int] [colour]", &haystack);
    drop(haystack);

    assert_eq!(result.haystack(), Some("größe: 12 grün"));
    assert_eq!(
        result.replace(["höhe", "7", "blau"]).unwrap(),
        "höhe: 7 blau"
    );
}

#[test]
fn pattern_errors() {
    assert!(matches!(
        Matcher::new("a|b|c"),
        Err(Error::Pattern(PatternError::SecondAlternation { pos: 3, ref snippet })) if snippet == "|c"
    ));
    assert!(matches!(
        Matcher::new("abc [name"),
        Err(Error::Pattern(PatternError::UnterminatedGroup { pos: 4, .. }))
    ));
    assert!(matches!(
        Matcher::new("[x:nosuchtype]"),
        Err(Error::UnknownType { .. })
    ));
    assert!(matches!(
        Matcher::new("[x] and [x]"),
        Err(Error::DuplicateGroupName { .. })
    ));
}

#[test]
fn flexible_spaces() {
    let m = Matcher::with_config("a b", Config::new().flexible_spaces(true)).unwrap();
    assert!(m.match_full("a    b").unwrap().is_match());
    assert!(!m.match_full("ab").unwrap().is_match());
    assert!(!full("a b", "a  b").is_match());
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn matchers_are_shared_between_threads() {
    assert_send_sync::<Matcher>();
    assert_send_sync::<MultiMatcher>();
    assert_send_sync::<MatchResult>();
    assert_send_sync::<MatchList>();
    assert_send_sync::<Registry>();

    let m = Matcher::new("[name:letters] is [age:int]").unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8i64)
            .map(|age| {
                let m = &m;
                s.spawn(move || (age, m.match_full(&format!("Tim is {age}")).unwrap()))
            })
            .collect();

        for handle in handles {
            let (age, result) = handle.join().unwrap();
            assert_eq!(result.get("name"), Some(&Value::from("Tim")));
            assert_eq!(result.get("age"), Some(&Value::Int(age)));
        }
    });
}
