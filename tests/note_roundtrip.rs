use quillnote::buffer::{TaggedBuffer, TextContainer};
use quillnote::codec::{deserialize, is_well_nested, serialize};
use quillnote::editor::{Message, NoteEditor};
use quillnote::style::{Decoration, PresetName, Size, StyleCommand, StyleEngine, Tag};

fn assert_same_content(a: &TaggedBuffer, b: &TaggedBuffer) {
    assert_eq!(a.text(), b.text());
    for offset in 0..a.len_chars() {
        assert_eq!(a.tags_at(offset), b.tags_at(offset), "offset {offset}");
    }
}

#[test]
fn test_engine_built_document_round_trips() {
    let mut buf = TaggedBuffer::empty();
    let mut engine = StyleEngine::new();

    engine.set_style_preset(&mut buf, PresetName::H1);
    buf.insert_at_cursor("Title\n");
    engine.pump(&mut buf);

    engine.set_style_preset(&mut buf, PresetName::Normal);
    buf.insert_at_cursor("Some ");
    engine.pump(&mut buf);
    engine.toggle_decoration(&mut buf, Decoration::Italic, None);
    buf.insert_at_cursor("slanted & <odd>");
    engine.pump(&mut buf);

    buf.set_selection(2..9);
    engine.toggle_decoration(&mut buf, Decoration::Underline, None);
    engine.set_size(&mut buf, Size::Pt14);
    engine.pump(&mut buf);

    let markup = serialize(&buf);
    assert!(is_well_nested(&markup));
    assert!(markup.contains("&amp; &lt;odd&gt;"));

    let mut loaded = TaggedBuffer::empty();
    deserialize(&markup, &mut loaded);
    assert_same_content(&buf, &loaded);
    assert_eq!(serialize(&loaded), markup);
}

#[test]
fn test_no_offset_carries_two_sizes() {
    let mut buf = TaggedBuffer::from_text("the quick brown fox");
    let mut engine = StyleEngine::new();
    buf.set_selection(0..10);
    engine.set_size(&mut buf, Size::Pt32);
    buf.set_selection(5..15);
    engine.set_style_preset(&mut buf, PresetName::H3);
    buf.set_selection(8..19);
    engine.set_size(&mut buf, Size::Pt10);

    for offset in 0..buf.len_chars() {
        assert!(buf.tags_at(offset).sizes().count() <= 1, "offset {offset}");
    }
}

#[test]
fn test_editor_session_save_and_reload() {
    let mut editor = NoteEditor::new();
    editor.load("todo", "");
    editor.update(Message::Style(StyleCommand::SetPreset(PresetName::H2)));
    editor.update(Message::Insert("Groceries".to_string()));
    editor.update(Message::Style(StyleCommand::SetPreset(PresetName::Normal)));
    editor.update(Message::Insert("\nmilk".to_string()));

    let saved = editor.save().expect("dirty note saves");
    assert_eq!(
        saved.markup,
        "<bold><size-22>Groceries</size-22></bold><size-11>\nmilk</size-11>"
    );

    let mut reopened = NoteEditor::new();
    reopened.load("todo", &saved.markup);
    assert_eq!(reopened.text(), "Groceries\nmilk");
    assert_eq!(
        reopened.buffer().tag_ranges(Tag::Size(Size::Pt22)),
        &[0..9]
    );
    assert!(!reopened.is_dirty());

    reopened.update(Message::Select(0..9));
    assert_eq!(reopened.current_style_preset().0, PresetName::H2);
    reopened.update(Message::Style(StyleCommand::ToggleDecoration(Decoration::Italic)));
    assert_eq!(reopened.current_style_preset().0, PresetName::Custom);
}
