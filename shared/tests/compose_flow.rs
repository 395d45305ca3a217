mod common;

use common::{
    camera_request, drive, feed, location_request, mounted_chat, storage_requests, store_requests,
    Tester,
};
use talk_core::capabilities::{
    CameraOperation, CameraOutput, ImageSource, LocalImage, LocationOperation, LocationOutput,
    PermissionStatus, StorageError, StorageOperation, StoreOperation, UploadOutput,
};
use talk_core::message::MessageDocument;
use talk_core::{ErrorKind, Event, Model, MAX_IMAGE_BYTES};

fn live_chat() -> (Tester, Model) {
    let (app, mut model) = mounted_chat();
    drive(&app, Event::ConnectivityChanged { online: true }, &mut model);
    (app, model)
}

fn added_documents(effects: Vec<talk_core::Effect>) -> Vec<MessageDocument> {
    store_requests(effects)
        .into_iter()
        .filter_map(|r| match r.operation {
            StoreOperation::Add { document, .. } => Some(document),
            _ => None,
        })
        .collect()
}

fn photo(size_bytes: u64) -> LocalImage {
    LocalImage {
        uri: "file:///tmp/photo.jpg".into(),
        mime_type: "image/jpeg".into(),
        size_bytes,
    }
}

#[test]
fn text_is_added_to_the_store() {
    let (app, mut model) = live_chat();

    let effects = drive(
        &app,
        Event::SendText {
            text: "hello".into(),
        },
        &mut model,
    );
    let added = added_documents(effects);
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].text, "hello");
    assert_eq!(added[0].user.id, "uid-ada");
    assert_eq!(added[0].user.name, "Ada");
    assert!(added[0].location.is_none());
    assert!(added[0].image_url.is_none());
}

#[test]
fn location_permission_denied_raises_one_alert() {
    let (app, mut model) = live_chat();

    let effects = drive(&app, Event::ShareLocation, &mut model);
    let mut permission = location_request(effects);
    assert_eq!(permission.operation, LocationOperation::RequestPermission);

    let update = app
        .resolve(
            &mut permission,
            Ok(LocationOutput::Permission(PermissionStatus::Denied)),
        )
        .expect("resolve permission");
    let effects = feed(&app, update.events, &mut model);

    assert!(added_documents(effects).is_empty());
    assert!(model.conversation.is_empty());
    let alert = model.alert.as_ref().expect("alert raised");
    assert_eq!(alert.kind, ErrorKind::LocationPermissionDenied);
    assert_eq!(alert.user_facing_message(), "Permissions haven't been granted.");
}

#[test]
fn granted_location_is_sent_without_text() {
    let (app, mut model) = live_chat();

    let effects = drive(&app, Event::ShareLocation, &mut model);
    let mut permission = location_request(effects);
    let update = app
        .resolve(
            &mut permission,
            Ok(LocationOutput::Permission(PermissionStatus::Granted)),
        )
        .expect("resolve permission");
    let effects = feed(&app, update.events, &mut model);

    let mut position = location_request(effects);
    assert_eq!(position.operation, LocationOperation::CurrentPosition);
    let update = app
        .resolve(
            &mut position,
            Ok(LocationOutput::Position {
                latitude: 52.52,
                longitude: 13.405,
            }),
        )
        .expect("resolve position");
    let added = added_documents(feed(&app, update.events, &mut model));

    assert_eq!(added.len(), 1);
    let location = added[0].location.expect("location payload");
    assert!((location.latitude - 52.52).abs() < f64::EPSILON);
    assert!((location.longitude - 13.405).abs() < f64::EPSILON);
    assert_eq!(added[0].text, "");
    assert!(added[0].image_url.is_none());
    assert!(model.alert.is_none());
}

#[test]
fn position_failure_raises_location_alert() {
    let (app, mut model) = live_chat();

    let effects = drive(&app, Event::ShareLocation, &mut model);
    let mut permission = location_request(effects);
    let update = app
        .resolve(
            &mut permission,
            Ok(LocationOutput::Permission(PermissionStatus::Granted)),
        )
        .expect("resolve permission");
    let mut position = location_request(feed(&app, update.events, &mut model));
    let update = app
        .resolve(
            &mut position,
            Err(talk_core::capabilities::LocationError::Timeout),
        )
        .expect("resolve position");
    let added = added_documents(feed(&app, update.events, &mut model));

    assert!(added.is_empty());
    assert_eq!(
        model.alert.as_ref().map(|a| a.kind),
        Some(ErrorKind::Location)
    );
}

/// Walks an image from permission to upload and returns the upload request.
fn upload_request(
    app: &Tester,
    model: &mut Model,
    event: Event,
    source: ImageSource,
    image: LocalImage,
) -> Vec<crux_core::Request<StorageOperation>> {
    let effects = drive(app, event, model);
    let mut permission = camera_request(effects);
    assert_eq!(
        permission.operation,
        CameraOperation::RequestPermission { source }
    );
    let update = app
        .resolve(
            &mut permission,
            Ok(CameraOutput::Permission(PermissionStatus::Granted)),
        )
        .expect("resolve permission");

    let mut acquire = camera_request(feed(app, update.events, model));
    assert_eq!(acquire.operation, CameraOperation::Acquire { source });
    let update = app
        .resolve(&mut acquire, Ok(CameraOutput::Acquired(image)))
        .expect("resolve acquire");
    storage_requests(feed(app, update.events, model))
}

#[test]
fn uploaded_image_is_sent_with_download_url() {
    let (app, mut model) = live_chat();

    let mut uploads = upload_request(
        &app,
        &mut model,
        Event::PickImage,
        ImageSource::Library,
        photo(2_000_000),
    );
    assert_eq!(uploads.len(), 1);
    let StorageOperation::Upload { key, image } = uploads[0].operation.clone();
    assert_eq!(image, photo(2_000_000));
    let id = key.strip_prefix("images/").expect("key under images/");
    assert!(!id.is_empty());

    let url = format!("https://storage.example.com/{key}?alt=media");
    let update = app
        .resolve(
            &mut uploads[0],
            Ok(UploadOutput {
                download_url: url.clone(),
            }),
        )
        .expect("resolve upload");
    let added = added_documents(feed(&app, update.events, &mut model));

    assert_eq!(added.len(), 1);
    assert_eq!(added[0].image_url.as_deref(), Some(url.as_str()));
    assert_eq!(added[0].text, "");
    assert!(added[0].location.is_none());
    // the stored object and the message share the generated id
    assert_eq!(added[0].id, id);
}

#[test]
fn failed_upload_sends_nothing() {
    let (app, mut model) = live_chat();

    let mut uploads = upload_request(
        &app,
        &mut model,
        Event::TakePhoto,
        ImageSource::Camera,
        photo(1024),
    );
    let update = app
        .resolve(
            &mut uploads[0],
            Err(StorageError::UploadFailed {
                message: "connection reset".into(),
            }),
        )
        .expect("resolve upload");
    let added = added_documents(feed(&app, update.events, &mut model));

    assert!(added.is_empty());
    assert_eq!(model.alert.as_ref().map(|a| a.kind), Some(ErrorKind::Upload));
}

#[test]
fn oversized_image_is_rejected_before_upload() {
    let (app, mut model) = live_chat();

    let uploads = upload_request(
        &app,
        &mut model,
        Event::PickImage,
        ImageSource::Library,
        photo(MAX_IMAGE_BYTES + 1),
    );

    assert!(uploads.is_empty());
    assert_eq!(
        model.alert.as_ref().map(|a| a.kind),
        Some(ErrorKind::ImageTooLarge)
    );
}

#[test]
fn camera_permission_denied_raises_alert() {
    let (app, mut model) = live_chat();

    let effects = drive(&app, Event::TakePhoto, &mut model);
    let mut permission = camera_request(effects);
    let update = app
        .resolve(
            &mut permission,
            Ok(CameraOutput::Permission(PermissionStatus::DeniedPermanently)),
        )
        .expect("resolve permission");
    let effects = feed(&app, update.events, &mut model);

    assert!(storage_requests(effects).is_empty());
    assert_eq!(
        model.alert.as_ref().map(|a| a.kind),
        Some(ErrorKind::CameraPermissionDenied)
    );

    drive(&app, Event::DismissAlert, &mut model);
    assert!(model.alert.is_none());
}

#[test]
fn upload_finishing_after_leaving_is_discarded() {
    let (app, mut model) = live_chat();

    let mut uploads = upload_request(
        &app,
        &mut model,
        Event::PickImage,
        ImageSource::Library,
        photo(1024),
    );
    drive(&app, Event::LeaveChat, &mut model);

    let update = app
        .resolve(
            &mut uploads[0],
            Ok(UploadOutput {
                download_url: "https://storage.example.com/images/x".into(),
            }),
        )
        .expect("resolve upload");
    let added = added_documents(feed(&app, update.events, &mut model));
    assert!(added.is_empty());
}
