use super::*;
use crate::transport::RenderReply;
use std::cell::RefCell;
use std::rc::Rc;

/// Records delivered commands; can be told to fail a send or reply with an error.
#[derive(Default)]
struct Recorder {
    log: Rc<RefCell<Vec<DrawCommand>>>,
    opened: Rc<RefCell<usize>>,
    fail_send_at: Option<usize>,
    reply: String,
}

struct RecorderStream {
    log: Rc<RefCell<Vec<DrawCommand>>>,
    fail_send_at: Option<usize>,
    reply: String,
}

impl Transport for Recorder {
    type Stream = RecorderStream;

    fn open(&mut self) -> TowerResult<RecorderStream> {
        *self.opened.borrow_mut() += 1;
        Ok(RecorderStream {
            log: Rc::clone(&self.log),
            fail_send_at: self.fail_send_at,
            reply: self.reply.clone(),
        })
    }
}

impl DrawStream for RecorderStream {
    fn send(&mut self, cmd: &DrawCommand) -> TowerResult<()> {
        if self.fail_send_at == Some(self.log.borrow().len()) {
            return Err(TowerError::transport("stream reset by peer"));
        }
        self.log.borrow_mut().push(cmd.clone());
        Ok(())
    }

    fn close_and_receive(self) -> TowerResult<RenderReply> {
        Ok(RenderReply::failed(self.reply))
    }
}

fn client() -> Client<Recorder> {
    Client::new(Recorder::default())
}

#[test]
fn drawing_before_start_is_no_active_session() {
    let mut c = client();
    assert!(matches!(
        c.fill(Color::RED, LayerId(0), PaintMode::Paint),
        Err(TowerError::NoActiveSession)
    ));
    assert!(matches!(c.render(), Err(TowerError::NoActiveSession)));
    assert_eq!(c.state().name(), "idle");
}

#[test]
fn drawing_after_commit_is_no_active_session() {
    let mut c = client();
    c.start_drawing().unwrap();
    c.fill(Color::RED, LayerId(0), PaintMode::Paint).unwrap();
    c.render().unwrap();
    assert_eq!(c.state().name(), "committed");

    assert!(matches!(
        c.set_layer_alpha(LayerId(0), 10),
        Err(TowerError::NoActiveSession)
    ));
    assert!(matches!(c.render(), Err(TowerError::NoActiveSession)));
}

#[test]
fn commands_are_delivered_in_program_order() {
    let mut c = client();
    let log = Rc::clone(&c.transport().log);
    c.start_drawing().unwrap();
    c.clear(&[]).unwrap();
    c.fill(Color::RED, LayerId(0), PaintMode::Paint).unwrap();
    c.set_pixels(&[Pixel::new((5, 5), Color::BLUE)], LayerId(1), PaintMode::Over)
        .unwrap();
    c.set_layer_origin(LayerId(1), (0, 0)).unwrap();
    c.auto_roll(LayerId(2), AutoRoll::start(4)).unwrap();
    assert_eq!(c.sent(), 5);

    let kinds: Vec<_> = log.borrow().iter().map(DrawCommand::kind).collect();
    assert_eq!(
        kinds,
        vec!["clear", "fill", "set_pixels", "set_layer_origin", "auto_roll"]
    );
}

#[test]
fn second_start_while_open_is_rejected() {
    let mut c = client();
    c.start_drawing().unwrap();
    assert!(matches!(
        c.start_drawing(),
        Err(TowerError::SessionAlreadyOpen)
    ));
    assert!(c.is_open());
}

#[test]
fn empty_reply_commits() {
    let mut c = client();
    c.start_drawing().unwrap();
    c.render().unwrap();
    assert!(!c.is_open());
}

#[test]
fn non_empty_reply_is_render_failed_verbatim() {
    let mut c = Client::new(Recorder {
        reply: "buffer overflow".to_string(),
        ..Recorder::default()
    });
    c.start_drawing().unwrap();
    match c.render() {
        Err(TowerError::RenderFailed(msg)) => assert_eq!(msg, "buffer overflow"),
        other => panic!("expected RenderFailed, got {other:?}"),
    }
    assert_eq!(c.state().name(), "failed");
    assert!(matches!(
        c.fill(Color::RED, LayerId(0), PaintMode::Paint),
        Err(TowerError::NoActiveSession)
    ));
}

#[test]
fn send_failure_poisons_session_until_restart() {
    let mut c = Client::new(Recorder {
        fail_send_at: Some(1),
        ..Recorder::default()
    });
    let opened = Rc::clone(&c.transport().opened);
    c.start_drawing().unwrap();
    c.fill(Color::RED, LayerId(0), PaintMode::Paint).unwrap();
    assert!(matches!(
        c.fill(Color::BLUE, LayerId(0), PaintMode::Paint),
        Err(TowerError::TransportFailure(_))
    ));
    assert!(matches!(
        c.fill(Color::GREEN, LayerId(0), PaintMode::Paint),
        Err(TowerError::NoActiveSession)
    ));

    c.start_drawing().unwrap();
    assert_eq!(*opened.borrow(), 2);
    assert_eq!(c.sent(), 0);
}

#[test]
fn inverted_rectangle_fails_before_sending() {
    let mut c = client();
    let log = Rc::clone(&c.transport().log);
    c.start_drawing().unwrap();
    let err = c
        .draw_rectangle(Rect::new((4, 4), (0, 0)), Color::WHITE, LayerId(0), PaintMode::Paint)
        .unwrap_err();
    assert!(matches!(err, TowerError::InvalidGeometry(_)));
    assert!(log.borrow().is_empty());
    assert_eq!(c.state().name(), "failed");
}

#[test]
fn wide_colors_are_truncated_before_sending() {
    let mut c = client();
    let log = Rc::clone(&c.transport().log);
    c.start_drawing().unwrap();
    c.write_text(
        "HI",
        "3x5",
        2,
        crate::foundation::core::Rgba16 {
            r: 0xABCD,
            g: 0,
            b: 0x01FF,
            a: 0xFFFF,
        },
        LayerId(3),
        PaintMode::Paint,
    )
    .unwrap();
    let sent = log.borrow();
    let DrawCommand::WriteText { color, layer, .. } = &sent[0] else {
        panic!("expected write_text");
    };
    assert_eq!(*color, Color::rgb(0xAB, 0, 0x01));
    assert_eq!(*layer, LayerId(3));
}

#[test]
fn idle_state_needs_no_default_stream() {
    // Recorder streams have no `Default`; the session must still start out idle.
    let state = SessionState::<RecorderStream>::default();
    assert_eq!(state.name(), "idle");
}
