mod common;

use common::{drive, mounted_chat};
use talk_core::model::BackgroundColor;
use talk_core::view::{AttachmentView, ComposerAction, ScreenView};
use talk_core::{CruxApp, App, Event, Model};

#[test]
fn start_screen_offers_four_colors() {
    let app = App;
    let model = Model::default();

    let ScreenView::Start {
        title,
        name_placeholder,
        colors,
        ..
    } = app.view(&model).screen
    else {
        panic!("expected start screen");
    };
    assert_eq!(title, "Talk with everyone");
    assert_eq!(name_placeholder, "Enter your name");
    let hexes: Vec<_> = colors.iter().map(|c| c.hex.as_str()).collect();
    assert_eq!(hexes, vec!["#090C08", "#474056", "#8A95A5", "#B9C6AE"]);
}

#[test]
fn chat_screen_reflects_session_and_connectivity() {
    let (tester, mut model) = mounted_chat();
    drive(
        &tester,
        Event::ConnectivityChanged { online: false },
        &mut model,
    );

    let ScreenView::Chat(chat) = App.view(&model).screen else {
        panic!("expected chat screen");
    };
    assert_eq!(chat.title, "Ada");
    assert_eq!(chat.background, BackgroundColor::default().hex());
    assert!(!chat.online);
    assert!(!chat.input_visible);
    assert_eq!(chat.messages.len(), 1);
    assert!(chat.messages[0].system);
    assert_eq!(
        chat.actions.iter().map(|a| a.label()).collect::<Vec<_>>(),
        ComposerAction::ALL.map(ComposerAction::label).to_vec()
    );

    drive(
        &tester,
        Event::ConnectivityChanged { online: true },
        &mut model,
    );
    let ScreenView::Chat(chat) = App.view(&model).screen else {
        panic!("expected chat screen");
    };
    assert!(chat.online);
    assert!(chat.input_visible);
}

#[test]
fn own_messages_use_dark_bubbles() {
    use talk_core::message::{Author, Content, Coordinate, Message, MessageId, UnixTimeMs, UserId};

    let (_tester, mut model) = mounted_chat();
    let mine = Message {
        id: MessageId::new("a"),
        created_at: UnixTimeMs(1),
        author: Author::new(UserId::new("uid-ada"), "Ada"),
        system: false,
        content: Content::Location {
            location: Coordinate::new(1.0, 2.0).expect("valid"),
        },
    };
    let theirs = Message {
        id: MessageId::new("b"),
        created_at: UnixTimeMs(2),
        author: Author::new(UserId::new("uid-bob"), "Bob"),
        system: false,
        content: Content::Text { text: "hi".into() },
    };
    model.conversation.replace(vec![mine, theirs]);

    let ScreenView::Chat(chat) = App.view(&model).screen else {
        panic!("expected chat screen");
    };
    assert!(chat.messages[0].is_own);
    assert_eq!(chat.messages[0].bubble_color, "#000");
    assert_eq!(chat.messages[0].text, "");
    assert!(matches!(
        chat.messages[0].attachment,
        Some(AttachmentView::Map { latitude_delta, longitude_delta, .. })
            if (latitude_delta - 0.0922).abs() < f64::EPSILON
                && (longitude_delta - 0.0421).abs() < f64::EPSILON
    ));
    assert!(!chat.messages[1].is_own);
    assert_eq!(chat.messages[1].bubble_color, "#fff");
}

#[test]
fn leaving_returns_to_start() {
    let (tester, mut model) = mounted_chat();
    drive(&tester, Event::LeaveChat, &mut model);
    assert!(matches!(
        App.view(&model).screen,
        ScreenView::Start { .. }
    ));
}
