use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex, PoisonError };

use log::{ debug, error, info };

use crate::scene::Scene;
use crate::canvas::Canvas;

pub enum Message {
    Row(usize),
    Terminate,
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, scene: Arc<Scene>, canvas: Arc<Mutex<Canvas>>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {

        let thread = thread::spawn(move || loop {
            // Obtain the next message; a closed channel ends the worker too.
            let message = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };

            match message {
                Ok(Message::Row(row)) => {
                    // Render outside of the lock, then copy the row over.
                    let colors = scene.render_row(row);
                    canvas.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .set_row(row, &colors);
                },

                Ok(Message::Terminate) | Err(_) => {
                    // Exit the worker thread loop, terminating the thread.
                    break;
                }
            }
        });

        Worker { id, thread: Some(thread) }
    }
}

pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    /// Starts `size` workers (at least one) rendering `scene` into `canvas`.
    pub fn new(size: usize, scene: Arc<Scene>, canvas: Arc<Mutex<Canvas>>)
        -> ThreadPool {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(
                id,
                Arc::clone(&scene),
                Arc::clone(&canvas),
                Arc::clone(&receiver)
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) {
        if self.sender.send(message).is_err() {
            error!("every render worker has stopped");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            // Workers which already stopped don't need telling.
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    error!("render worker {} panicked", worker.id);
                }
            }
        }
    }
}

/// Renders a scene with `threads` workers, one image row at a time.
///
/// Every pixel is traced independently, so the image is identical to the one
/// produced by `Scene::render`.
pub fn parallel_render(scene: Scene, threads: usize) -> Canvas {
    let (rows, cols) = scene.camera.resolution();
    let canvas = Arc::new(Mutex::new(Canvas::new(rows, cols)));

    info!("Rendering {}x{} pixels using {} threads...",
        cols, rows, threads.max(1));
    {
        let mut thread_pool = ThreadPool::new(
            threads, Arc::new(scene), Arc::clone(&canvas)
        );

        for row in 0..rows {
            thread_pool.execute(Message::Row(row));
        }

        debug!("queued {} rows", rows);
    }
    info!("...done.");

    // Every worker has been joined, so no other reference remains.
    match Arc::try_unwrap(canvas) {
        Ok(canvas) => canvas.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => shared.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    }
}

#[test]
fn parallel_render_matches_serial_render() {
    use crate::camera::Camera;
    use crate::color::Color;
    use crate::coordinate_system::CoordinateSystem;
    use crate::light::{ Illumination, LightSource };
    use crate::material::Material;
    use crate::shape::Shape;
    use crate::vector::Vector;

    let camera = Camera::new((12, 16), Vector::new(10.0, 0.0, 2.0),
        Vector::new(-1.0, 0.0, -0.2), 0.8, 0.0);
    let objects = vec![
        Shape::checkered_plane(CoordinateSystem::default(), 1.0, None, None),
        Shape::smooth_sphere(Vector::new(0.0, 0.0, 1.0), 1.0,
            Material::diffuse(Color::teal()).with_reflection(0.3)),
    ];
    let lights = vec![
        LightSource::point(Vector::new(2.0, 3.0, 6.0), Color::white(), 30.0),
    ];
    let scene = Scene::new(camera, objects,
        Illumination::new(Color::grey(0.1), lights));

    let serial = scene.render();
    for &threads in [1, 3, 8].iter() {
        assert_eq!(parallel_render(scene.clone(), threads), serial);
    }
}

#[test]
fn zero_threads_still_renders() {
    let scene = Scene::new(
        crate::camera::Camera::new((2, 2), Default::default(),
            crate::vector::Vector::new(1.0, 0.0, 0.0), 1.0, 0.0),
        Vec::new(), Default::default()
    );

    let image = parallel_render(scene, 0);
    assert_eq!((image.rows, image.cols), (2, 2));
}
