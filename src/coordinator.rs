use crate::{
    config::Configuration,
    error::AppError,
    intake::landmark::LandmarkReader,
    network::{Server, SubscriberSupervisor},
    pipeline::services::{EventPublishingService, GesturePipeline},
};
use std::{net::SocketAddr, time::Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::{Service, ServiceExt};
use tracing::{debug, error, info, warn};

struct RunningTasks {
    local_addr: SocketAddr,
    pipeline_task: Option<JoinHandle<Result<(), AppError>>>,
    server_task: JoinHandle<Result<(), AppError>>,
    supervisor_task: JoinHandle<()>,
}

/// Wires the landmark source, the gesture pipeline and the event server.
pub struct Coordinator {
    configuration: Configuration,
    source: Option<Box<dyn LandmarkReader>>,
    publisher: EventPublishingService,
    cancel_token: CancellationToken,
    tasks: Option<RunningTasks>,
}

impl Coordinator {
    fn new(configuration: Configuration, source: Box<dyn LandmarkReader>) -> Self {
        let publisher = EventPublishingService::new(configuration.event_buffer_size);
        Self {
            configuration,
            source: Some(source),
            publisher,
            cancel_token: CancellationToken::new(),
            tasks: None,
        }
    }

    /// Binds the server and starts processing frames. Calling it again while
    /// running only returns the bound address.
    pub async fn start(&mut self) -> Result<SocketAddr, AppError> {
        if let Some(tasks) = &self.tasks {
            warn!("Coordinator already started on {}", tasks.local_addr);
            return Ok(tasks.local_addr);
        }
        let source = self
            .source
            .take()
            .ok_or_else(|| AppError::Source("Landmark source already consumed".to_string()))?;

        let (supervisor_task, supervisor) = SubscriberSupervisor::spawn();
        let server = match Server::bind(
            &self.configuration.server.address(),
            supervisor.clone(),
            self.publisher.clone(),
        )
        .await
        {
            Ok(server) => server,
            Err(e) => {
                let _ = supervisor.shutdown().await;
                return Err(e);
            }
        };
        let local_addr = server.local_addr()?;
        let server_task = tokio::spawn(server.run(self.cancel_token.clone()));

        let pipeline = GesturePipeline::new(self.configuration.gesture.clone(), Instant::now());
        let pipeline_task = tokio::spawn(run_pipeline(
            source,
            pipeline,
            self.publisher.clone(),
            self.cancel_token.clone(),
        ));

        info!("Gesture bridge started on {}", local_addr);
        self.tasks = Some(RunningTasks {
            local_addr,
            pipeline_task: Some(pipeline_task),
            server_task,
            supervisor_task,
        });
        Ok(local_addr)
    }

    /// Resolves when frame processing ends, with the source's error if it
    /// failed. Cancel safe: dropping this future leaves the task to `stop`.
    pub async fn wait(&mut self) -> Result<(), AppError> {
        let Some(task) = self
            .tasks
            .as_mut()
            .and_then(|tasks| tasks.pipeline_task.as_mut())
        else {
            return Ok(());
        };
        let result = task.await;
        if let Some(tasks) = self.tasks.as_mut() {
            tasks.pipeline_task = None;
        }
        result?
    }

    /// Cancels the pipeline (dropping the landmark source) and closes every
    /// consumer connection.
    pub async fn stop(&mut self) -> Result<(), AppError> {
        self.cancel_token.cancel();
        let Some(tasks) = self.tasks.take() else {
            return Ok(());
        };

        if let Some(task) = tasks.pipeline_task {
            match task.await {
                Ok(Err(e)) => error!("Pipeline ended with error: {}", e),
                Err(e) => error!("Pipeline task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
        let server_result = tasks.server_task.await?;
        tasks.supervisor_task.await?;
        info!("Gesture bridge stopped");
        server_result
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.tasks.as_ref().map(|tasks| tasks.local_addr)
    }

    pub fn subscriber_count(&self) -> usize {
        self.publisher.subscriber_count()
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn run_pipeline(
    mut source: Box<dyn LandmarkReader>,
    mut pipeline: GesturePipeline,
    mut publisher: EventPublishingService,
    cancel_token: CancellationToken,
) -> Result<(), AppError> {
    info!("Gesture pipeline running");
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                info!("Gesture pipeline cancelled");
                break;
            }
            frame = source.read() => frame?,
        };
        let Some(frame) = frame else {
            info!("Landmark source finished");
            break;
        };

        let event = pipeline.process(frame.observation.as_ref(), Instant::now());
        let delivered = publisher.ready().await?.call(event).await?;
        debug!("Frame {:?} published to {} consumer(s)", frame.id, delivered);
    }
    Ok(())
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    source: Option<Box<dyn LandmarkReader>>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            source: None,
        }
    }

    // Overrides the configured listen host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.configuration.server.host = host.into();
        self
    }

    // Overrides the configured listen port; 0 picks a free port.
    pub fn port(mut self, port: u16) -> Self {
        self.configuration.server.port = port;
        self
    }

    // Adjusts the event hand-off capacity.
    pub fn event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.configuration.event_buffer_size = event_buffer_size;
        self
    }

    pub fn source(mut self, source: Box<dyn LandmarkReader>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<Coordinator, AppError> {
        self.configuration.validate()?;
        let source = self
            .source
            .ok_or(AppError::Source("Landmark source not set".to_string()))?;
        Ok(Coordinator::new(self.configuration, source))
    }
}
