use pretty_assertions::assert_eq;
use slide_sync_engine::mapping::cumulative_offsets;
use slide_sync_engine::{Deck, EditorFocus, HostMessage, SlideCoord, SyncSession, load_deck, preview_url};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/site/content")
        .join(relative)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn offset_of(text: &str, needle: &str) -> usize {
    text.find(needle).unwrap()
}

/// Every slide of the deck as `H/V file start..end`, in presentation order.
fn deck_map(deck: &Deck) -> String {
    let offsets = cumulative_offsets(deck.documents());
    let mut lines = Vec::new();
    for (document, offset) in deck.documents().iter().zip(offsets) {
        for slide in document.slides() {
            let global = SlideCoord::new(slide.horizontal + offset, slide.vertical);
            let location = deck.locate(global).unwrap();
            assert_eq!(location.path, document.path());
            lines.push(format!(
                "{global} {} {}..{}",
                location.path.file_name().unwrap().to_string_lossy(),
                location.range.start,
                location.range.end
            ));
        }
    }
    lines.join("\n")
}

#[test]
fn fixture_talk_deck_map() {
    let intro = fixture("talk/01-intro.md");
    let deck = load_deck(&intro, &read(&intro)).unwrap();

    assert_eq!(deck.url_path().as_str(), "talk");
    insta::assert_snapshot!(deck_map(&deck), @r"
    0/0 _index.md 0..34
    1/0 _index.md 34..45
    2/0 01-intro.md 0..70
    3/0 01-intro.md 70..78
    4/0 02-deep.md 0..50
    4/1 02-deep.md 50..66
    4/2 02-deep.md 66..101
    5/0 02-deep.md 101..111
    6/0 appendix.md 0..33
    7/0 notes.md 0..31
    ");
}

#[test]
fn cursor_movement_drives_the_viewer() {
    let deep = fixture("talk/02-deep.md");
    let text = read(&deep);
    let mut session = SyncSession::new();

    let (_, shown) = session
        .open(&deep, &text, offset_of(&text, "## Deeper"))
        .unwrap();
    assert_eq!(shown, Some(SlideCoord::new(4, 1)));

    let message = session
        .cursor_moved(&deep, offset_of(&text, "## After"))
        .unwrap();
    assert_eq!(
        message.to_json().unwrap(),
        r#"{"command":"show_slide","slide":{"horiz":5,"vert":0}}"#
    );

    // Inside the fenced block the rule is not a boundary.
    let intro = fixture("talk/01-intro.md");
    let intro_text = read(&intro);
    assert_eq!(
        session.cursor_moved(&intro, offset_of(&intro_text, "Still intro")),
        Some(HostMessage::ShowSlide {
            slide: SlideCoord::new(2, 0)
        })
    );
}

#[test]
fn viewer_navigation_drives_the_editor() {
    let index = fixture("talk/_index.md");
    let intro = fixture("talk/01-intro.md");
    let mut session = SyncSession::new();
    let (id, _) = session.open(&index, &read(&index), 0).unwrap();
    let editor = HashMap::from([(index.clone(), 0), (intro.clone(), 0)]);

    let focus = session
        .handle_viewer_message(
            id,
            r#"{"eventName":"slidechanged","state":{"indexh":3,"indexv":0}}"#,
            &editor,
        )
        .unwrap();

    assert_eq!(
        focus,
        Some(EditorFocus {
            path: intro,
            range: 70..78,
        })
    );
}

#[test]
fn nested_index_starts_a_separate_deck() {
    let talk = fixture("talk/_index.md");
    let other = fixture("talk/other/slide.md");
    let mut session = SyncSession::new();

    let (talk_id, _) = session.open(&talk, &read(&talk), 0).unwrap();
    let (other_id, shown) = session.open(&other, &read(&other), 0).unwrap();

    assert_ne!(talk_id, other_id);
    assert_eq!(shown, Some(SlideCoord::new(1, 0)));
    assert_eq!(session.deck_for(&fixture("talk/other/index.md")), Some(other_id));
    assert_eq!(session.deck_for(&fixture("talk/notes.md")), Some(talk_id));

    let deck = session.deck(other_id).unwrap();
    assert_eq!(
        preview_url("http://localhost:1313", deck.url_path(), shown.unwrap()),
        "http://localhost:1313/talk/other#/1/0"
    );
}

#[test]
fn site_index_deck_includes_home_section() {
    let about = fixture("home/about.md");
    let text = read(&about);
    let mut session = SyncSession::new();

    let (id, shown) = session
        .open(&about, &text, offset_of(&text, "Contact"))
        .unwrap();

    assert_eq!(shown, Some(SlideCoord::new(2, 0)));
    let deck = session.deck(id).unwrap();
    assert_eq!(deck.documents().len(), 2);
    assert_eq!(
        preview_url("http://localhost:1313", deck.url_path(), SlideCoord::new(2, 0)),
        "http://localhost:1313/#/2/0"
    );
}

#[test]
fn unsaved_weight_change_reorders_deck() {
    let intro = fixture("talk/01-intro.md");
    let notes = fixture("talk/notes.md");
    let mut session = SyncSession::new();
    session.open(&intro, &read(&intro), 0).unwrap();

    let change = session
        .text_changed(&intro, "---\nweight: 25\n---\n\n## Intro\n")
        .unwrap();
    assert!(change.resorted);
    assert_eq!(change.slide_count, 1);

    // _index (2), 02-deep (2), 01-intro (1), appendix (1), then notes.
    assert_eq!(
        session.cursor_moved(&notes, 0),
        Some(HostMessage::ShowSlide {
            slide: SlideCoord::new(6, 0)
        })
    );
}
