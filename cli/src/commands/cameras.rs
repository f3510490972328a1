use crate::app::App;
use crate::args::CamerasCommand;
use crate::output::{self, confirm, or_dash};
use anyhow::{bail, Result};
use ventasimple_types::{Camera, CameraInput, EventFilter, RemoteId};

pub async fn run(app: &App, command: CamerasCommand) -> Result<()> {
    let token = app.token()?;
    match command {
        CamerasCommand::List => {
            let list = app.client.list_cameras(&token).await?;
            output::emit(app.json, &list, |list| {
                if !list.enabled {
                    let hint = if list.requested {
                        "activation requested"
                    } else {
                        "run `ventasimple cameras request-activation`"
                    };
                    println!("Camera monitoring is not enabled ({hint}).");
                }
                for camera in &list.items {
                    print_camera(camera);
                }
            })
        }
        CamerasCommand::Add { name, rtsp_url } => {
            let input = CameraInput { name, rtsp_url };
            let camera = app.client.create_camera(&token, &input).await?;
            output::emit(app.json, &camera, print_camera)
        }
        CamerasCommand::Update { id, name, rtsp_url } => {
            let id = RemoteId::new(id);
            let list = app.client.list_cameras(&token).await?;
            let Some(current) = list.items.iter().find(|c| c.id.as_ref() == Some(&id)) else {
                bail!("no camera with id {id}");
            };
            let input = CameraInput {
                name: name.unwrap_or_else(|| current.name.clone()),
                rtsp_url: rtsp_url.unwrap_or_else(|| current.rtsp_url.clone()),
            };
            let camera = app.client.update_camera(&token, &id, &input).await?;
            output::emit(app.json, &camera, print_camera)
        }
        CamerasCommand::Toggle { id } => {
            let camera = app.client.toggle_camera(&token, &RemoteId::new(id)).await?;
            output::emit(app.json, &camera, print_camera)
        }
        CamerasCommand::Test { id } => {
            let result = app.client.test_camera(&token, &RemoteId::new(id)).await?;
            output::emit(app.json, &result, |r| {
                let verdict = if r.ok { "Stream OK" } else { "Stream failed" };
                match &r.message {
                    Some(message) => println!("{verdict}: {message}"),
                    None => println!("{verdict}."),
                }
            })
        }
        CamerasCommand::Delete { id, yes } => {
            confirm(yes, &format!("delete camera {id}"))?;
            let result = app.client.delete_camera(&token, &RemoteId::new(id)).await?;
            output::emit(app.json, &result, |_| println!("Camera deleted."))
        }
        CamerasCommand::RequestActivation => {
            let result = app.client.request_ai_activation(&token).await?;
            output::emit(app.json, &result, |_| println!("Activation requested."))
        }
        CamerasCommand::Events {
            camera,
            kind,
            limit,
        } => {
            let filter = EventFilter {
                camera_id: camera,
                kind,
                limit,
            };
            let events = app.client.list_camera_events(&token, &filter).await?;
            // Names are cosmetic; a failed lookup just prints ids.
            let cameras = app.client.list_cameras(&token).await.unwrap_or_default();
            output::emit(app.json, &events, |events| {
                for event in events {
                    let when = event
                        .timestamp()
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let camera = event
                        .camera_id
                        .as_ref()
                        .map(|id| cameras.name_of(id).unwrap_or(id.as_str()))
                        .unwrap_or("-");
                    println!(
                        "{when}  {camera:<20} {:<12} {}",
                        or_dash(event.kind.as_deref()),
                        event.confidence_label().unwrap_or_default()
                    );
                }
            })
        }
    }
}

fn print_camera(camera: &Camera) {
    let id = camera.id.as_ref().map(RemoteId::as_str);
    let state = if camera.is_active() { "on" } else { "off" };
    println!(
        "{:<6} {:<20} {state:<4} {}",
        or_dash(id),
        camera.name,
        camera.rtsp_url
    );
}
