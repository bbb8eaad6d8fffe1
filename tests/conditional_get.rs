use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use atom_sync::http::{Client, ClientConfig, Credentials};
use atom_sync::sync::Outcome;
use atom_sync::Feed;

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <title>Example Feed</title>
  <updated>2003-12-13T18:30:02Z</updated>
  <author><name>John Doe</name></author>
  <entry>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <title>Atom-Powered Robots Run Amok</title>
    <updated>2003-12-13T18:30:02Z</updated>
    <content type="html">&lt;p&gt;Some text.&lt;/p&gt;</content>
  </entry>
</feed>"#;

const LAST_MODIFIED: &str = "Wed, 15 Nov 1995 04:58:08 GMT";

/// The request line and headers (lowercased names) of one request.
struct Seen {
    request_line: String,
    headers: Vec<(String, String)>,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|h| h.0 == name).map(|h| &h.1[..])
    }
}

fn read_request(stream: &TcpStream) -> Seen {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_owned()));
        }
    }
    Seen { request_line: request_line.trim_end().to_owned(), headers: headers }
}

/// Serve one canned response per connection, in order, reporting what each
/// request looked like.
fn serve(responses: Vec<String>) -> (String, Receiver<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/feed.atom", listener.local_addr().unwrap());
    let (tx, rx) = channel();
    thread::spawn(move || {
        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let seen = read_request(&stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(seen).unwrap();
        }
    });
    (url, rx)
}

fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {}\r\nConnection: close\r\nContent-Length: {}\r\n",
                          status, body.len());
    for &(name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

#[test]
fn test_conditional_get_over_http() {
    let (url, seen) = serve(vec![
        response("200 OK",
                 &[("Content-Type", "application/atom+xml"), ("ETag", "\"xyzzy\""),
                   ("Last-Modified", LAST_MODIFIED)],
                 FEED),
        response("304 Not Modified", &[("ETag", "\"xyzzy\"")], ""),
    ]);
    let mut client = Client::with_config(ClientConfig {
        user_agent: "conditional-get-test".to_owned(),
        ..Default::default()
    });
    let mut feed = Feed::with_source(&url).unwrap();

    assert_eq!(feed.update(&mut client).unwrap(), Outcome::Updated);
    let first = seen.recv().unwrap();
    assert_eq!(first.request_line, "GET /feed.atom HTTP/1.1");
    assert_eq!(first.header("user-agent"), Some("conditional-get-test"));
    assert_eq!(first.header("if-none-match"), None);
    assert_eq!(feed.entries().len(), 1);
    assert_eq!(feed.title().map(|t| t.to_string()), Some("Example Feed".to_owned()));
    assert_eq!(feed.etag.as_deref(), Some("\"xyzzy\""));
    assert_eq!(feed.last_modified.as_deref(), Some(LAST_MODIFIED));

    assert_eq!(feed.update(&mut client).unwrap(), Outcome::NotModified);
    let second = seen.recv().unwrap();
    assert_eq!(second.header("if-none-match"), Some("\"xyzzy\""));
    assert_eq!(second.header("if-modified-since"), Some(LAST_MODIFIED));
    assert_eq!(feed.entries().len(), 1);
    assert!(feed.entries()[0].content().is_some());
}

#[test]
fn test_basic_auth_over_http() {
    let (url, seen) = serve(vec![
        response("401 Unauthorized", &[("WWW-Authenticate", "Basic realm=\"feeds\"")], ""),
        response("200 OK", &[], FEED),
    ]);
    let mut client = Client::new();
    client.when_auth(|_, realm| match realm {
        Some("feeds") => Some(Credentials::new("Aladdin", "open sesame")),
        _ => None,
    });
    let mut feed = Feed::with_source(&url).unwrap();
    assert_eq!(feed.update(&mut client).unwrap(), Outcome::Updated);
    assert_eq!(seen.recv().unwrap().header("authorization"), None);
    assert_eq!(seen.recv().unwrap().header("authorization"),
               Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="));
    assert_eq!(feed.etag, None);
}
