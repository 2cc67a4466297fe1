use super::*;
use crate::graphics_device::mock_graphics_device::mock_context;

#[test]
fn test_owned_handle_creates_object() {
    let (context, state) = mock_context();
    let owned = OwnedHandle::create(&context, ObjectKind::Buffer).unwrap();

    assert!(owned.get().is_some());
    assert_eq!(owned.kind(), ObjectKind::Buffer);
    assert_eq!(state.borrow().live_count(), 1);
}

#[test]
fn test_release_is_idempotent() {
    let (context, state) = mock_context();
    let mut owned = OwnedHandle::create(&context, ObjectKind::Texture).unwrap();

    owned.release();
    owned.release();

    assert!(owned.is_released());
    assert_eq!(state.borrow().calls_named("delete_object"), 1);
}

#[test]
fn test_drop_releases() {
    let (context, state) = mock_context();
    {
        let _owned = OwnedHandle::create(&context, ObjectKind::Framebuffer).unwrap();
    }
    assert_eq!(state.borrow().deleted, 1);
}

#[test]
fn test_drop_after_release_does_not_delete_twice() {
    let (context, state) = mock_context();
    {
        let mut owned = OwnedHandle::create(&context, ObjectKind::Renderbuffer).unwrap();
        owned.release();
    }
    assert_eq!(state.borrow().calls_named("delete_object"), 1);
}

#[test]
fn test_require_after_release_is_invalid_state() {
    let (context, _state) = mock_context();
    let mut owned = OwnedHandle::create(&context, ObjectKind::Program).unwrap();
    owned.release();

    assert!(matches!(owned.require(), Err(Error::InvalidState(_))));
}

#[test]
fn test_release_while_context_borrowed_leaks_without_panicking() {
    let (context, state) = mock_context();
    let mut owned = OwnedHandle::create(&context, ObjectKind::Buffer).unwrap();

    {
        let _busy = context.borrow_mut();
        owned.release();
    }

    assert!(owned.is_released());
    assert_eq!(state.borrow().deleted, 0);
}

#[test]
fn test_create_failure_leaves_nothing() {
    let (context, state) = mock_context();
    state.borrow_mut().refuse_objects = true;

    assert!(OwnedHandle::create(&context, ObjectKind::Buffer).is_err());
    assert_eq!(state.borrow().live_count(), 0);
}
